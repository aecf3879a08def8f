//! CLI argument parsing with clap.

use clap::Parser;

use crate::config::DefaultsConfig;

/// Turn a text prompt into an image, from the terminal or a local browser UI.
#[derive(Parser, Debug)]
#[command(name = "pixprompt", version, about)]
pub struct Cli {
    /// Text prompt describing the desired image.
    #[arg(conflicts_with = "prompt_file")]
    pub prompt: Option<String>,

    /// Path to a file containing the prompt text.
    #[arg(short = 'p', long, conflicts_with = "prompt")]
    pub prompt_file: Option<String>,

    /// Model name or short alias [config default: imagen-4].
    #[arg(short, long)]
    pub model: Option<String>,

    /// Aspect ratio (e.g., 1:1, 16:9, 9:16).
    #[arg(short, long)]
    pub aspect_ratio: Option<String>,

    /// Image size: 1K, 2K, 4K.
    #[arg(short, long)]
    pub size: Option<String>,

    /// Quality (`OpenAI` only): auto, low, medium, high.
    #[arg(short, long)]
    pub quality: Option<String>,

    /// Output format: png, jpeg, webp.
    #[arg(short, long)]
    pub format: Option<String>,

    /// Output file path (auto-generated if not specified).
    #[arg(short, long)]
    pub output: Option<String>,

    /// Config file path override.
    #[arg(long)]
    pub config: Option<String>,

    /// Serve the browser UI instead of generating once.
    #[arg(long, conflicts_with_all = ["prompt", "prompt_file", "output"])]
    pub serve: bool,

    /// Address for the browser UI [config default: 127.0.0.1:8080]. Only with `--serve`.
    #[arg(long, conflicts_with_all = ["prompt", "prompt_file", "output"])]
    pub listen: Option<String>,

    /// Verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Generation options after merging CLI flags over config defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    /// Model name or alias, not yet resolved.
    pub model: String,
    /// Aspect ratio.
    pub aspect_ratio: String,
    /// Size tier.
    pub size: String,
    /// Quality level.
    pub quality: String,
    /// Output format.
    pub format: String,
}

impl Cli {
    /// Resolve the prompt from either the positional argument or the file flag.
    ///
    /// # Errors
    ///
    /// Returns an error if neither prompt nor prompt-file is provided,
    /// or if the file cannot be read.
    pub fn resolve_prompt(&self) -> Result<String, std::io::Error> {
        if let Some(ref text) = self.prompt {
            Ok(text.clone())
        } else if let Some(ref path) = self.prompt_file {
            std::fs::read_to_string(path)
        } else {
            Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Provide a prompt string, use -p/--prompt-file, or pass --serve",
            ))
        }
    }

    /// Reject flag combinations clap cannot express.
    ///
    /// # Errors
    ///
    /// Returns an error when `--listen` is given without `--serve`.
    pub fn check_serve_flags(&self) -> Result<(), String> {
        if self.listen.is_some() && !self.serve {
            return Err("--listen requires --serve".to_string());
        }
        Ok(())
    }

    /// Fill unset flags from the config defaults.
    #[must_use]
    pub fn resolve_options(&self, defaults: &DefaultsConfig) -> Resolved {
        let pick = |flag: &Option<String>, fallback: &str| flag.clone().unwrap_or_else(|| fallback.to_string());
        Resolved {
            model: pick(&self.model, &defaults.model),
            aspect_ratio: pick(&self.aspect_ratio, &defaults.aspect_ratio),
            size: pick(&self.size, &defaults.size),
            quality: pick(&self.quality, &defaults.quality),
            format: pick(&self.format, &defaults.format),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positional_prompt() {
        let cli = Cli::parse_from(["pixprompt", "a cat"]);
        assert_eq!(cli.resolve_prompt().unwrap(), "a cat");
        assert!(!cli.serve);
    }

    #[test]
    fn prompt_file_flag() {
        let dir = std::env::temp_dir().join(format!("pixprompt_cli_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("prompt.txt");
        std::fs::write(&path, "prompt from file").unwrap();

        let cli = Cli::parse_from(["pixprompt", "-p", path.to_str().unwrap()]);
        assert!(cli.prompt.is_none());
        assert_eq!(cli.resolve_prompt().unwrap(), "prompt from file");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn unset_flags_fall_back_to_config() {
        let cli = Cli::parse_from(["pixprompt", "a cat"]);
        let resolved = cli.resolve_options(&DefaultsConfig::default());
        assert_eq!(resolved.model, "imagen-4");
        assert_eq!(resolved.aspect_ratio, "1:1");
        assert_eq!(resolved.format, "png");
    }

    #[test]
    fn flags_override_config() {
        let cli = Cli::parse_from([
            "pixprompt", "-m", "gpt-1", "-a", "16:9", "-s", "2K", "-q", "high", "-f", "jpeg", "-o",
            "out.jpg", "-v", "a landscape",
        ]);
        let resolved = cli.resolve_options(&DefaultsConfig::default());
        assert_eq!(resolved.model, "gpt-1");
        assert_eq!(resolved.aspect_ratio, "16:9");
        assert_eq!(resolved.size, "2K");
        assert_eq!(resolved.quality, "high");
        assert_eq!(resolved.format, "jpeg");
        assert_eq!(cli.output.as_deref(), Some("out.jpg"));
        assert!(cli.verbose);
    }

    #[test]
    fn serve_mode() {
        let cli = Cli::parse_from(["pixprompt", "--serve", "--listen", "0.0.0.0:3000"]);
        assert!(cli.serve);
        assert_eq!(cli.listen.as_deref(), Some("0.0.0.0:3000"));
        assert!(cli.resolve_prompt().is_err());
    }

    #[test]
    fn serve_conflicts_with_prompt() {
        assert!(Cli::try_parse_from(["pixprompt", "--serve", "a cat"]).is_err());
        assert!(Cli::try_parse_from(["pixprompt", "--listen", "0.0.0.0:3000", "a cat"]).is_err());
    }

    #[test]
    fn listen_without_serve_is_rejected() {
        let cli = Cli::parse_from(["pixprompt", "--listen", "0.0.0.0:3000"]);
        assert!(cli.check_serve_flags().is_err());

        let cli = Cli::parse_from(["pixprompt", "--serve", "--listen", "0.0.0.0:3000"]);
        assert!(cli.check_serve_flags().is_ok());
        assert!(Cli::parse_from(["pixprompt", "a cat"]).check_serve_flags().is_ok());
    }

    #[test]
    fn no_prompt_errors() {
        let cli = Cli::parse_from(["pixprompt"]);
        assert!(cli.resolve_prompt().is_err());
    }
}
