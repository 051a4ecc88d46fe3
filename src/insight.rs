use crate::report::Report;
use anyhow::{bail, Context, Result};
use std::io::Write;
use std::process::{Command, Stdio};
use tracing::warn;

/// Source externe de conseils en langage naturel (optionnelle, peut être indisponible).
pub trait InsightProvider {
    fn insights(&self, report: &Report) -> Result<String>;
}

/// Passe le rapport rendu sur l'entrée standard d'une commande externe et
/// récupère sa sortie standard.
#[derive(Debug, Clone)]
pub struct CommandInsights {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandInsights {
    /// Découpe une ligne de commande simple (séparation par espaces).
    pub fn parse(command_line: &str) -> Result<Self> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts.next().context("empty insights command")?;
        Ok(Self {
            program,
            args: parts.collect(),
        })
    }
}

impl InsightProvider for CommandInsights {
    fn insights(&self, report: &Report) -> Result<String> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("spawning {}", self.program))?;
        {
            let mut stdin = child.stdin.take().context("insights stdin unavailable")?;
            stdin.write_all(report.to_string().as_bytes())?;
        }
        let output = child.wait_with_output()?;
        if !output.status.success() {
            bail!("{} exited with {}", self.program, output.status);
        }
        let text = String::from_utf8(output.stdout).context("insights output is not UTF-8")?;
        let text = text.trim();
        if text.is_empty() {
            bail!("{} produced no insights", self.program);
        }
        Ok(text.to_string())
    }
}

/// Rapport rendu, suivi d'une section INSIGHTS quand un fournisseur est
/// configuré. Un échec du fournisseur n'empêche jamais le rapport.
pub fn render_with_insights(report: &Report, provider: Option<&dyn InsightProvider>) -> String {
    let mut out = report.to_string();
    let Some(provider) = provider else {
        return out;
    };
    out.push_str("\n\nINSIGHTS\n--------\n");
    match provider.insights(report) {
        Ok(text) => out.push_str(&text),
        Err(err) => {
            warn!(error = %err, "insight provider unavailable");
            out.push_str("Insights unavailable.");
        }
    }
    out
}
