use crate::db::{DbPool, OrmConn};
use crate::token::TokenCodec;

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub tokens: TokenCodec,
}
