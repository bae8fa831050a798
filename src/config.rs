use std::{path::PathBuf, time::Duration};

use clap::{Parser, ValueEnum};

use crate::scene::Layout;

const DEFAULT_TEXT: &str = "HELLO\\nI BUILD THINGS";

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum LayoutArg {
    Classic,
    Extended,
}

impl From<LayoutArg> for Layout {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::Classic => Layout::Classic,
            LayoutArg::Extended => Layout::Extended,
        }
    }
}

/// Particle portfolio viewer.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// Number of particles in every shape.
    #[arg(long, default_value_t = 6000)]
    particles: usize,

    #[arg(long, value_enum, default_value_t = LayoutArg::Extended)]
    layout: LayoutArg,

    /// Hero text; a literal `\n` starts a new line.
    #[arg(long, default_value = DEFAULT_TEXT)]
    text: String,

    /// Initial section index.
    #[arg(long, default_value_t = 0)]
    section: i32,

    /// Minimum time between section changes.
    #[arg(long, default_value_t = 1200)]
    cooldown_ms: u64,

    /// Image used for the bullet sprites instead of the generated one.
    #[arg(long)]
    bullet_texture: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub particles: usize,
    pub layout: Layout,
    pub text: String,
    pub section: i32,
    pub cooldown: Duration,
    pub bullet_texture: Option<PathBuf>,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Self {
            particles: args.particles,
            layout: args.layout.into(),
            text: args.text.replace("\\n", "\n"),
            section: args.section,
            cooldown: Duration::from_millis(args.cooldown_ms),
            bullet_texture: args.bullet_texture,
        }
    }
}

impl Config {
    pub fn from_args() -> Self {
        Args::parse().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Config {
        Args::parse_from(argv).into()
    }

    #[test]
    fn defaults() {
        let config = parse(&["particle-folio"]);
        assert_eq!(config.particles, 6000);
        assert_eq!(config.layout, Layout::Extended);
        assert_eq!(config.text, "HELLO\nI BUILD THINGS");
        assert_eq!(config.section, 0);
        assert_eq!(config.cooldown, Duration::from_millis(1200));
        assert!(config.bullet_texture.is_none());
    }

    #[test]
    fn flags_override_defaults() {
        let config = parse(&[
            "particle-folio",
            "--particles",
            "1200",
            "--layout",
            "classic",
            "--text",
            "A\\nB",
            "--section",
            "3",
            "--cooldown-ms",
            "500",
            "--bullet-texture",
            "bullet.png",
        ]);
        assert_eq!(config.particles, 1200);
        assert_eq!(config.layout, Layout::Classic);
        assert_eq!(config.text, "A\nB");
        assert_eq!(config.section, 3);
        assert_eq!(config.cooldown, Duration::from_millis(500));
        assert_eq!(config.bullet_texture, Some(PathBuf::from("bullet.png")));
    }
}
