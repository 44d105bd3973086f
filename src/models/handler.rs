use std::sync::Arc;

use crate::engine::GiveawayEngine;

#[derive(Clone)]
pub struct Handler {
    pub engine: Arc<GiveawayEngine>,
}
