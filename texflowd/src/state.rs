use std::sync::Arc;

use crate::compile::CompileEngine;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<CompileEngine>,
}
