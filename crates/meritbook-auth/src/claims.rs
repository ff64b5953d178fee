//! Access-token claims.

use meritbook_models::{ClassId, RoleId};
use serde::{Deserialize, Serialize};

/// Claims embedded in an access token.
///
/// Deliberately **not** the permission list: permissions are resolved from
/// the role store on every guarded request so administrative changes take
/// effect without a re-login. The token only pins who the user is and which
/// role (and class, for students) they act as.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    pub email: String,
    /// Role name, e.g. `GIANG_VIEN`
    pub role: String,
    pub role_id: RoleId,
    /// The class a student or class monitor belongs to
    pub class_id: Option<ClassId>,
    pub exp: usize,
    pub iat: usize,
}
