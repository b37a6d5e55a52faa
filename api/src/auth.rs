//! # Authentication endpoints
//!
//! Request types here are wire-exact (`correo`, `contrasena`) and the raw JSON
//! response is returned untouched: the store's extractor owns reconciling the
//! backend's inconsistent `{token, usuario}` placement, so nothing is decoded
//! prematurely here.

use serde::Serialize;
use serde_json::{json, Value};

use crate::client::ApiClient;
use crate::error::ApiClientError;

/// Login credentials.
#[derive(Clone, Debug, Serialize)]
pub struct Credenciales {
    pub correo: String,
    pub contrasena: String,
}

/// Registration form.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Registro {
    pub nombre: String,
    pub apellido: String,
    pub correo: String,
    pub contrasena: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telefono: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documento: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tipo_documento: Option<String>,
}

/// Log in. Feed the result to `SessionStore::persist`.
pub async fn login(
    client: &ApiClient,
    credenciales: &Credenciales,
) -> Result<Value, ApiClientError> {
    client.post("/usuarios/login", credenciales, None).await
}

/// Create an account. The session starts only after verification.
pub async fn registrar(client: &ApiClient, registro: &Registro) -> Result<Value, ApiClientError> {
    client.post("/usuarios/registrar", registro, None).await
}

/// Confirm the verification code sent to the registered email address.
/// On success the response carries the initial `{token, usuario}` pair.
pub async fn verificar_registro(
    client: &ApiClient,
    correo: &str,
    codigo: &str,
) -> Result<Value, ApiClientError> {
    client
        .post(
            "/usuarios/verificar",
            &json!({"correo": correo, "codigo": codigo}),
            None,
        )
        .await
}
