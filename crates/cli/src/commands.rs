//! CLI subcommands.

use anyhow::{bail, Context};
use clap::Subcommand;
use client::CertificateService;
use corelib::{ComposedConfig, Identity, NetworkSettings};
use std::fmt;
use targeting::{org_filter, resolve_org, PeerDirectory, TargetFilter};

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Compose the configuration and summarize organizations and peers
    Check,

    /// List peers with their resolved URLs
    Peers {
        /// Only peers of this organization's MSP
        #[arg(long)]
        org: Option<String>,
    },

    /// Print the signing certificate of `user` or `user@org`
    Cert { user: String },

    /// Print the composed configuration as YAML
    Embed,
}

/// Text produced by a command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandResult {
    pub lines: Vec<String>,
}

impl CommandResult {
    fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }
}

impl fmt::Display for CommandResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

impl Command {
    pub fn execute(&self, settings: &NetworkSettings) -> anyhow::Result<CommandResult> {
        let composed = settings.compose().context("invalid network configuration")?;
        match self {
            Command::Check => check(&composed),
            Command::Peers { org } => peers(&composed, org.as_deref()),
            Command::Cert { user } => cert(&composed, user),
            Command::Embed => {
                let yaml = composed.resolved().to_yaml().context("failed to render configuration")?;
                Ok(CommandResult {
                    lines: yaml.lines().map(str::to_string).collect(),
                })
            }
        }
    }
}

fn check(composed: &ComposedConfig) -> anyhow::Result<CommandResult> {
    let config = composed.resolved();
    let directory = PeerDirectory::from_config(config)?;
    let mut result = CommandResult::default();

    result.push(format!(
        "configuration: {} layer(s), override {}",
        composed.layers().len(),
        if composed.has_override() { "applied" } else { "absent" }
    ));
    result.push(format!("default organization: {}", resolve_org(config, None)));
    for name in config.organizations.keys() {
        let msp = match composed.lookup_msp_id(name) {
            Some((msp, origin)) => format!("{} ({})", msp, origin),
            None => "-".to_string(),
        };
        result.push(format!("  {:<12} {}", name, msp));
    }
    result.push(format!("channels: {}", config.channels.len()));
    result.push(format!("peers: {}", directory.len()));
    Ok(result)
}

fn peers(composed: &ComposedConfig, org: Option<&str>) -> anyhow::Result<CommandResult> {
    let config = composed.resolved();
    let directory = PeerDirectory::from_config(config)?;

    let filter = match org {
        Some(org) => match org_filter(config, Some(org)) {
            Some(filter) => Some(filter),
            None => bail!("{}", resolve_org(config, Some(org))),
        },
        None => None,
    };

    let mut result = CommandResult::default();
    for peer in directory.peers() {
        if filter.as_ref().map_or(true, |f| f.accept(peer)) {
            result.push(format!("{:<28} {:<32} {}", peer.name, peer.url, peer.msp_id));
        }
    }
    Ok(result)
}

fn cert(composed: &ComposedConfig, user: &str) -> anyhow::Result<CommandResult> {
    let identity = Identity::parse(user);
    if identity.is_anonymous() {
        bail!("user name is not specified");
    }
    let service = CertificateService::new(composed.shared());
    let text = service
        .try_user_certificate(&identity)
        .with_context(|| format!("no certificate for {}", identity))?;
    Ok(CommandResult {
        lines: text.lines().map(str::to_string).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const NETWORK: &str = r#"
client:
  organization: org1
organizations:
  org1:
    mspid: Org1MSP
    peers: [peer0.org1.example.com]
  org2:
    mspid: Org2MSP
    peers: [peer0.org2.example.com]
peers:
  peer0.org1.example.com:
    url: peer0.org1.example.com:7051
  peer0.org2.example.com:
    url: peer0.org2.example.com:9051
"#;

    const MATCHERS: &str = r#"
organizations:
  org2:
    mspid: Org2MSPv2
"#;

    fn settings() -> NetworkSettings {
        NetworkSettings::new(NETWORK, MATCHERS)
    }

    #[test]
    fn test_check_reports_override_origin() {
        let result = Command::Check.execute(&settings()).unwrap();
        let text = result.to_string();
        assert!(text.contains("override applied"));
        assert!(text.contains("Org2MSPv2 (override)"));
        assert!(text.contains("Org1MSP (base)"));
        assert!(text.contains("peers: 2"));
    }

    #[test]
    fn test_peers_filtered_by_org() {
        let result = Command::Peers {
            org: Some("org1".into()),
        }
        .execute(&settings())
        .unwrap();
        assert_eq!(result.lines.len(), 1);
        assert!(result.lines[0].starts_with("peer0.org1.example.com"));

        let all = Command::Peers { org: None }.execute(&settings()).unwrap();
        assert_eq!(all.lines.len(), 2);
    }

    #[test]
    fn test_peers_unknown_org_fails() {
        let err = Command::Peers {
            org: Some("org7".into()),
        }
        .execute(&settings())
        .unwrap_err();
        assert!(err.to_string().contains("org7"));
    }

    #[test]
    fn test_embed_prints_merged_yaml() {
        let result = Command::Embed.execute(&settings()).unwrap();
        assert!(result.to_string().contains("Org2MSPv2"));
    }

    #[test]
    fn test_embed_keeps_unmodelled_keys() {
        let network = "name: test-network\nclient:\n  organization: org1\n  connection:\n    timeout:\n      peer:\n        endorser: '300'\n";
        let text = Command::Embed
            .execute(&NetworkSettings::new(network, ""))
            .unwrap()
            .to_string();
        assert!(text.contains("name: test-network"));
        assert!(text.contains("endorser"));
        assert!(!text.contains("cryptoconfig"));
    }

    #[test]
    fn test_cert_without_crypto_path_fails() {
        assert!(Command::Cert { user: "Admin".into() }.execute(&settings()).is_err());
        assert!(Command::Cert { user: "".into() }.execute(&settings()).is_err());
    }
}
