use std::path::PathBuf;

/// Fatal errors of a compile run.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("input directory `{0}` does not exist")]
    InputMissing(PathBuf),

    #[error("output directory `{output}` contains the input directory `{input}`")]
    OutputContainsInput { output: PathBuf, input: PathBuf },

    #[error("I/O error at `{path}`")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Walk(#[from] walkdir::Error),

    #[error("could not empty output directory `{path}` after {attempts} attempts")]
    OutputNotCleared { path: PathBuf, attempts: u32 },

    #[error("invalid configuration in `{path}`")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl CompileError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = CompileError> = std::result::Result<T, E>;
