//! Unique human-readable reference codes (`DROP-0042`, `TCKT-482913`).

use std::sync::{Arc, Mutex};

use rand::rngs::StdRng;
use rand::SeedableRng;

use common::{AppError, AppResult};
use domain::CodeFormat;

use crate::repository::CodeStore;

/// Draws codes of one format until the store reports one as free.
///
/// The pre-check does not reserve the code: callers still rely on the unique
/// index and redraw when an insert hits it.
pub struct CodeGenerator {
    format: CodeFormat,
    store: Arc<dyn CodeStore>,
    rng: Mutex<StdRng>,
}

impl CodeGenerator {
    pub fn new(format: CodeFormat, store: Arc<dyn CodeStore>) -> Self {
        Self::with_rng(format, store, StdRng::from_entropy())
    }

    /// Generator drawing from a caller-supplied RNG
    pub fn with_rng(format: CodeFormat, store: Arc<dyn CodeStore>, rng: StdRng) -> Self {
        Self {
            format,
            store,
            rng: Mutex::new(rng),
        }
    }

    pub fn format(&self) -> CodeFormat {
        self.format
    }

    /// Draw until an unused code is found.
    ///
    /// There is no attempt limit; a scope that is full never returns.
    pub async fn generate(&self) -> AppResult<String> {
        let mut attempts: u32 = 0;
        loop {
            let candidate = self.draw()?;
            attempts += 1;

            if !self.store.is_taken(&candidate).await? {
                if attempts > 1 {
                    tracing::debug!(code = %candidate, attempts, "Generated code after collisions");
                }
                return Ok(candidate);
            }
        }
    }

    fn draw(&self) -> AppResult<String> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| AppError::internal("Code generator RNG poisoned"))?;
        Ok(self.format.draw(&mut *rng))
    }
}
