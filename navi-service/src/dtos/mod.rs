pub mod auth;
pub mod bus;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MsgResponse {
    #[schema(example = "Navi X backend alive")]
    pub msg: String,
}

/// Body of every error response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = "Bus 7 not found")]
    pub msg: String,
}
