use crate::props::InvalidPropError;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error(transparent)]
    InvalidProp(InvalidPropError),

    #[error(transparent)]
    Engine(minijinja::Error),
}

impl From<minijinja::Error> for RenderError {
    /// A prop failure anywhere in the engine error's source chain wins over the
    /// engine error wrapping it.
    fn from(err: minijinja::Error) -> Self {
        let mut source: Option<&(dyn std::error::Error + 'static)> = Some(&err);
        while let Some(e) = source {
            if let Some(invalid) = e.downcast_ref::<InvalidPropError>() {
                return RenderError::InvalidProp(invalid.clone());
            }
            source = e.source();
        }
        RenderError::Engine(err)
    }
}

impl From<InvalidPropError> for RenderError {
    fn from(err: InvalidPropError) -> Self {
        RenderError::InvalidProp(err)
    }
}
