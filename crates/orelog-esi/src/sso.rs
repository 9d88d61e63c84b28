//! [`TokenExchange`] implementation and the SSO authorize URL builder.
//!
//! Uses the v2 OAuth endpoints; the application authenticates with HTTP
//! Basic (client id / secret key) on the token endpoint.

use orelog_core::{
  character::{TokenBundle, VerifiedCharacter},
  client::TokenExchange,
};
use serde::Deserialize;

use crate::{Error, EsiClient, Result};

/// The only scope this application requests.
pub const MINING_SCOPE: &str = "esi-industry.read_character_mining.v1";

/// Claims returned by `GET /oauth/verify`.
#[derive(Debug, Deserialize)]
struct VerifyResponse {
  #[serde(rename = "CharacterID")]
  character_id:   i64,
  #[serde(rename = "CharacterName")]
  character_name: String,
  #[serde(rename = "CharacterOwnerHash")]
  owner_hash:     String,
}

impl EsiClient {
  /// The SSO authorize URL a user is redirected to at login.
  ///
  /// Fails only when the configured SSO base URL cannot be parsed.
  pub fn authorize_url(&self, state: &str) -> Result<String> {
    let base = self.sso_url("/v2/oauth/authorize/");
    let url = reqwest::Url::parse_with_params(&base, &[
      ("response_type", "code"),
      ("redirect_uri", self.config().callback_url.as_str()),
      ("client_id", self.config().client_id.as_str()),
      ("scope", MINING_SCOPE),
      ("state", state),
    ])
    .map_err(|e| Error::InvalidBaseUrl(e.to_string()))?;
    Ok(url.to_string())
  }

  async fn token_request(&self, form: &[(&str, &str)]) -> Result<TokenBundle> {
    let resp = self
      .client()
      .post(self.sso_url("/v2/oauth/token"))
      .basic_auth(&self.config().client_id, Some(&self.config().secret_key))
      .form(form)
      .send()
      .await?;

    if !resp.status().is_success() {
      return Err(Error::TokenRejected { status: resp.status() });
    }
    Ok(resp.json().await?)
  }
}

impl TokenExchange for EsiClient {
  type Error = Error;

  async fn exchange_code(&self, code: &str) -> Result<TokenBundle> {
    self
      .token_request(&[("grant_type", "authorization_code"), ("code", code)])
      .await
  }

  async fn refresh(&self, refresh_token: &str) -> Result<TokenBundle> {
    self
      .token_request(&[
        ("grant_type", "refresh_token"),
        ("refresh_token", refresh_token),
      ])
      .await
  }

  async fn verify(&self, access_token: &str) -> Result<VerifiedCharacter> {
    let path = "/oauth/verify".to_owned();
    let resp = self
      .client()
      .get(self.sso_url(&path))
      .bearer_auth(access_token)
      .send()
      .await?;

    if !resp.status().is_success() {
      return Err(Error::UnexpectedStatus { path, status: resp.status() });
    }

    let claims: VerifyResponse = resp.json().await?;
    Ok(VerifiedCharacter {
      character_id:   claims.character_id,
      character_name: claims.character_name,
      owner_hash:     claims.owner_hash,
    })
  }
}

#[cfg(test)]
mod tests {
  use crate::{EsiClient, EsiConfig};

  fn client() -> EsiClient {
    EsiClient::new(EsiConfig {
      client_id:    "client-abc".into(),
      secret_key:   "secret".into(),
      callback_url: "http://localhost:8080/sso/callback".into(),
      user_agent:   "orelog-test".into(),
      esi_base_url: "https://esi.evetech.net/latest".into(),
      sso_base_url: "https://login.eveonline.com".into(),
    })
    .unwrap()
  }

  #[test]
  fn authorize_url_carries_all_params() {
    let url = client().authorize_url("state-token-123").unwrap();

    assert!(url.starts_with("https://login.eveonline.com/v2/oauth/authorize/?"));
    assert!(url.contains("response_type=code"));
    assert!(url.contains("client_id=client-abc"));
    assert!(url.contains("state=state-token-123"));
    assert!(url.contains("esi-industry.read_character_mining.v1"));
    // redirect_uri must be percent-encoded
    assert!(url.contains("redirect_uri=http%3A%2F%2Flocalhost%3A8080%2Fsso%2Fcallback"));
  }

  #[test]
  fn verify_response_uses_sso_field_names() {
    let claims: super::VerifyResponse = serde_json::from_str(
      r#"{
        "CharacterID": 91000001,
        "CharacterName": "Retribution Endless",
        "CharacterOwnerHash": "gOLO…=",
        "ExpiresOn": "2024-01-01T00:00:00",
        "Scopes": "esi-industry.read_character_mining.v1"
      }"#,
    )
    .unwrap();

    assert_eq!(claims.character_id, 91000001);
    assert_eq!(claims.character_name, "Retribution Endless");
  }
}
