//! # Administrative-capability resolution
//!
//! Decides whether a user belongs to the administrative tier (employee or
//! administrator) given the heterogeneous role shapes in [`crate::models::Rol`].
//!
//! The precedence is fixed and short-circuiting:
//!
//! 1. **Numeric role id** (from `rol` as a number, `rol.id`, `id_rol`, `idRol`,
//!    in that order): 2 and 3 are administrative, 1 is a customer. Decisive —
//!    a conflicting permission matrix cannot override it.
//! 2. **Permission matrix**: a read grant on any module in [`ADMIN_MODULES`].
//! 3. **Role name**: case-insensitive match against [`ADMIN_ROLE_NAMES`].
//! 4. Otherwise the user is a customer.
//!
//! The tables below are the reviewable source of truth for that precedence;
//! nothing here ever panics on a malformed record.

use crate::models::{Rol, Usuario};

/// Role ids that map to the administrative tier (2 = empleado, 3 = administrador).
pub const ADMIN_ROLE_IDS: [i64; 2] = [2, 3];

/// Role id of the customer tier.
pub const CLIENT_ROLE_ID: i64 = 1;

/// Role names that map to the administrative tier, matched case-insensitively.
pub const ADMIN_ROLE_NAMES: [&str; 7] = [
    "administrador",
    "admin",
    "empleado",
    "employee",
    "supervisor",
    "gerente",
    "manager",
];

/// Modules whose `leer` grant marks a permission matrix as administrative.
pub const ADMIN_MODULES: [&str; 10] = [
    "dashboard",
    "gestion_dashboard",
    "usuarios",
    "empleados",
    "clientes",
    "solicitudes",
    "citas",
    "pagos",
    "roles",
    "servicios",
];

/// First numeric role id found, walking the legacy carriers in priority order.
fn numeric_role_id(usuario: &Usuario) -> Option<i64> {
    match &usuario.rol {
        Some(Rol::Id(id)) => return Some(*id),
        Some(Rol::Detalle(d)) => {
            if let Some(id) = d.id {
                return Some(id);
            }
        }
        _ => {}
    }
    usuario.id_rol.or(usuario.id_rol_legacy)
}

fn name_is_administrative(nombre: &str) -> bool {
    let nombre = nombre.trim().to_lowercase();
    ADMIN_ROLE_NAMES.contains(&nombre.as_str())
}

/// Whether the user holds administrative capability. Pure and total.
pub fn is_administrative(usuario: &Usuario) -> bool {
    // Known numeric ids are decisive and short-circuit everything else.
    match numeric_role_id(usuario) {
        Some(id) if ADMIN_ROLE_IDS.contains(&id) => return true,
        Some(CLIENT_ROLE_ID) => return false,
        _ => {}
    }

    match &usuario.rol {
        Some(Rol::Detalle(d)) => {
            if let Some(permisos) = &d.permisos {
                let granted = ADMIN_MODULES
                    .iter()
                    .any(|m| permisos.get(*m).is_some_and(|c| c.leer));
                if granted {
                    return true;
                }
            }
            // Empty or absent matrix falls through to the name check.
            d.nombre.as_deref().is_some_and(name_is_administrative)
        }
        Some(Rol::Nombre(nombre)) => name_is_administrative(nombre),
        _ => false,
    }
}
