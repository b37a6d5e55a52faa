//! # Canonical session models
//!
//! The backend's authentication endpoints have drifted across versions, so the
//! user record tolerates every shape observed in the wild. Field names are
//! wire-exact (`nombre`, `correo`, `rol`, ...) — they must round-trip bit-exact
//! against the backend.
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`Sesion`] | The canonical `{token, usuario}` pair. Valid only when both are non-empty. |
//! | [`Usuario`] | Identity plus authorization material, with legacy role-id carriers. |
//! | [`Rol`] | Untagged sum over the three observed role shapes: numeric id, plain name, or detail object. |
//! | [`Capacidades`] | Per-module CRUD flags inside a permission matrix. |

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Per-module capability flags as the backend's permission matrix encodes them.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Capacidades {
    #[serde(default)]
    pub crear: bool,
    #[serde(default)]
    pub leer: bool,
    #[serde(default)]
    pub actualizar: bool,
    #[serde(default)]
    pub eliminar: bool,
}

/// Module name → capability flags.
pub type Permisos = HashMap<String, Capacidades>;

/// The expanded role shape `{id, nombre, permisos}`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RolDetalle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nombre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permisos: Option<Permisos>,
}

/// The `rol` field as observed across backend versions.
///
/// Order matters: serde tries the variants top to bottom, so a bare number
/// decodes as [`Rol::Id`], a bare string as [`Rol::Nombre`], and an object as
/// [`Rol::Detalle`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Rol {
    Id(i64),
    Nombre(String),
    Detalle(RolDetalle),
}

/// A backend user record.
///
/// Every field defaults so that authorization stays computable from any of the
/// historical shapes without a decode failure. `id_rol` / `idRol` are legacy
/// alternate carriers for the role id kept for bit-exact round-trips.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Usuario {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub nombre: String,
    #[serde(default)]
    pub apellido: String,
    #[serde(default)]
    pub correo: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telefono: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documento: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tipo_documento: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rol: Option<Rol>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_rol: Option<i64>,
    #[serde(default, rename = "idRol", skip_serializing_if = "Option::is_none")]
    pub id_rol_legacy: Option<i64>,
}

/// The canonical session pair. Replace-only: a new login builds a new `Sesion`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sesion {
    pub token: String,
    pub usuario: Usuario,
}

impl Sesion {
    /// A session is usable only when both halves carry data.
    pub fn is_complete(&self) -> bool {
        !self.token.is_empty() && self.usuario != Usuario::default()
    }
}
