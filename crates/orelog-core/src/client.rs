//! Traits for the remote capabilities the sync pipeline consumes.
//!
//! Implemented for real by `orelog-esi`; tests substitute in-memory fakes.

use std::future::Future;

use crate::{
  character::{TokenBundle, VerifiedCharacter},
  record::{OreType, RawMiningEntry},
};

/// The paginated remote mining-activity listing.
pub trait ActivityApi: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Fetch one page of a character's mining ledger. Pages are 1-based; an
  /// empty page signals the end of the listing.
  fn mining_ledger_page<'a>(
    &'a self,
    character_id: i64,
    page: u32,
    access_token: &'a str,
  ) -> impl Future<Output = Result<Vec<RawMiningEntry>, Self::Error>> + Send + 'a;
}

/// Reference-data lookup: ore type id to display name and unit volume.
pub trait CatalogLookup: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn ore_type(
    &self,
    type_id: i64,
  ) -> impl Future<Output = Result<OreType, Self::Error>> + Send + '_;
}

/// The SSO token endpoints.
pub trait TokenExchange: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Exchange an authorization code for a token bundle (login flow).
  fn exchange_code<'a>(
    &'a self,
    code: &'a str,
  ) -> impl Future<Output = Result<TokenBundle, Self::Error>> + Send + 'a;

  /// Exchange a refresh token for a fresh bundle.
  fn refresh<'a>(
    &'a self,
    refresh_token: &'a str,
  ) -> impl Future<Output = Result<TokenBundle, Self::Error>> + Send + 'a;

  /// Resolve the identity behind an access token.
  fn verify<'a>(
    &'a self,
    access_token: &'a str,
  ) -> impl Future<Output = Result<VerifiedCharacter, Self::Error>> + Send + 'a;
}
