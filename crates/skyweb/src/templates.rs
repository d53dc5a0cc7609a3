//! Named HTML templates.
//!
//! Templates are compiled into the binary by default. In debug mode they are
//! read from disk on every render so edits show up without a rebuild.

use std::path::PathBuf;

use minijinja::Environment;

use crate::context::RenderContext;

/// Templates bundled into the binary, as `(name, source)`.
const EMBEDDED: &[(&str, &str)] = &[
    ("base.html", include_str!("../templates/base.html")),
    ("home.html", include_str!("../templates/home.html")),
    ("profile.html", include_str!("../templates/profile.html")),
    ("post.html", include_str!("../templates/post.html")),
    ("error.html", include_str!("../templates/error.html")),
];

/// Source of page templates.
pub enum Templates {
    /// Parsed once at startup.
    Bundled(Environment<'static>),
    /// Loaded from this directory on each render.
    Filesystem(PathBuf),
}

impl Templates {
    /// Templates compiled into the binary.
    pub fn embedded() -> Result<Self, minijinja::Error> {
        Self::from_sources(EMBEDDED.iter().copied())
    }

    /// Templates loaded from `dir` at render time.
    pub fn from_dir(dir: impl Into<PathBuf>) -> Self {
        Self::Filesystem(dir.into())
    }

    /// Templates from in-memory sources.
    pub fn from_sources(
        sources: impl IntoIterator<Item = (&'static str, &'static str)>,
    ) -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        for (name, source) in sources {
            env.add_template(name, source)?;
        }
        Ok(Self::Bundled(env))
    }

    /// Render template `name` with `ctx`.
    pub fn render(&self, name: &str, ctx: &RenderContext) -> Result<String, minijinja::Error> {
        match self {
            Self::Bundled(env) => env.get_template(name)?.render(ctx),
            Self::Filesystem(dir) => {
                let mut env = Environment::new();
                env.set_loader(minijinja::path_loader(dir));
                let template = env.get_template(name)?;
                template.render(ctx)
            }
        }
    }
}

impl std::fmt::Debug for Templates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bundled(_) => f.write_str("Bundled"),
            Self::Filesystem(dir) => f.debug_tuple("Filesystem").field(dir).finish(),
        }
    }
}
