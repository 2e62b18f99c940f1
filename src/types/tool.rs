pub trait Tool {
    type Context;
    fn apply(&self, context: Self::Context) -> anyhow::Result<String>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoContext();
