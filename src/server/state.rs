use std::sync::Arc;

use herald_insights::InsightGenerator;

#[derive(Clone)]
pub struct ServeState {
    generator: Arc<InsightGenerator>,
}

impl ServeState {
    pub fn new(generator: Arc<InsightGenerator>) -> Self {
        Self { generator }
    }

    pub fn generator(&self) -> &InsightGenerator {
        &self.generator
    }

    pub fn insights_configured(&self) -> bool {
        self.generator.is_configured()
    }
}
