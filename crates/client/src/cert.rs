//! Signing certificate lookup.
//!
//! A user's certificate lives under the organization's `cryptoPath` template:
//!
//! ```text
//! <cryptoconfig.path>/<cryptoPath with {username}>/signcerts/<user>@<domain>-cert.pem
//! ```
//!
//! where `<domain>` is the organization directory three levels above the
//! template (`peerOrganizations/<domain>/users/{username}@<domain>/msp`). When
//! that file is missing, the first `.pem` file in `signcerts` is used.
//!
//! Lookup failures are typed internally as [`CertificateError`] and surface
//! to callers of [`CertificateService::user_certificate`] as an empty string.

use crate::error::ClientError;
use crate::registry::ClientRegistry;
use crate::request::{RequestFailure, RequestInput, RequestOutput};
use corelib::{env, Identity, NetworkConfig};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;
use x509_parser::certificate::X509Certificate;
use x509_parser::der_parser::oid::Oid;
use x509_parser::objects::{oid2sn, oid_registry};
use x509_parser::pem::parse_x509_pem;

const USERNAME_PLACEHOLDER: &str = "{username}";

/// Why a certificate could not be produced.
#[derive(Debug, Error)]
pub enum CertificateError {
    #[error("no organization requested and no default configured")]
    NoOrganization,

    #[error("organization {0} is not configured")]
    UnknownOrganization(String),

    #[error("organization {0} has no crypto path")]
    NoCryptoPath(String),

    #[error("cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no certificate file in {}", .0.display())]
    NotFound(PathBuf),

    #[error("invalid PEM data: {0}")]
    Pem(String),

    #[error("unexpected data after the certificate block")]
    TrailingData,

    #[error("invalid X.509 certificate: {0}")]
    X509(String),
}

/// Reads and renders users' signing certificates.
#[derive(Debug, Clone)]
pub struct CertificateService {
    config: Arc<NetworkConfig>,
}

impl CertificateService {
    pub fn new(config: Arc<NetworkConfig>) -> Self {
        Self { config }
    }

    /// Service over the registry's composed configuration.
    pub fn from_registry(registry: &ClientRegistry) -> crate::Result<Self> {
        Ok(Self::new(registry.network()?.shared()))
    }

    /// Certificate text for `user` or `user@org`, or an empty string if it
    /// cannot be read.
    pub fn user_certificate(&self, user: &str) -> String {
        let identity = Identity::parse(user);
        match self.try_user_certificate(&identity) {
            Ok(text) => text,
            Err(e) => {
                debug!(identity = %identity, error = %e, "certificate unavailable");
                String::new()
            }
        }
    }

    pub fn try_user_certificate(&self, identity: &Identity) -> Result<String, CertificateError> {
        let path = self.certificate_path(identity)?;
        debug!(identity = %identity, path = %path.display(), "reading certificate");
        let pem = fs::read(&path).map_err(|source| CertificateError::Read { path, source })?;
        render_certificate(&pem)
    }

    /// Location of the signing certificate of `identity`.
    pub fn certificate_path(&self, identity: &Identity) -> Result<PathBuf, CertificateError> {
        let org = identity
            .org()
            .or_else(|| self.config.default_organization())
            .ok_or(CertificateError::NoOrganization)?;
        let template = self
            .config
            .organization(org)
            .ok_or_else(|| CertificateError::UnknownOrganization(org.to_string()))?
            .crypto_path
            .as_deref()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| CertificateError::NoCryptoPath(org.to_string()))?;

        let template = env::subst(template);
        let domain = org_domain(&template).unwrap_or(org);
        let mut msp_dir = PathBuf::from(template.replace(USERNAME_PLACEHOLDER, &identity.user));
        if msp_dir.is_relative() {
            if let Some(root) = self.config.crypto_root() {
                msp_dir = Path::new(&env::subst(root)).join(msp_dir);
            }
        }

        let signcerts = msp_dir.join("signcerts");
        let preferred = signcerts.join(format!("{}@{}-cert.pem", identity.user, domain));
        if preferred.is_file() {
            return Ok(preferred);
        }
        first_pem(&signcerts)
    }

    /// Request-level lookup: `{200, "", <text>}`. The text is empty when the
    /// certificate cannot be read.
    pub fn execute(&self, input: &RequestInput) -> Result<RequestOutput, RequestFailure> {
        let identity = input.identity();
        if identity.is_anonymous() {
            return Err(RequestFailure::from_error(ClientError::Identity(
                "user name is not specified".to_string(),
            )));
        }
        let text = self.user_certificate(&identity.to_string());
        Ok(RequestOutput {
            code: 200,
            message: String::new(),
            result: Some(Value::String(text)),
        })
    }
}

fn org_domain(template: &str) -> Option<&str> {
    Path::new(template)
        .parent()?
        .parent()?
        .parent()?
        .file_name()?
        .to_str()
}

fn first_pem(dir: &Path) -> Result<PathBuf, CertificateError> {
    let entries = fs::read_dir(dir).map_err(|source| CertificateError::Read {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut candidates: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "pem"))
        .collect();
    candidates.sort();
    candidates
        .into_iter()
        .next()
        .ok_or_else(|| CertificateError::NotFound(dir.to_path_buf()))
}

/// Decodes a single PEM certificate and renders it as text.
pub fn render_certificate(pem: &[u8]) -> Result<String, CertificateError> {
    let (rest, block) = parse_x509_pem(pem).map_err(|e| CertificateError::Pem(e.to_string()))?;
    if rest.iter().any(|b| !b.is_ascii_whitespace()) {
        return Err(CertificateError::TrailingData);
    }
    let cert = block
        .parse_x509()
        .map_err(|e| CertificateError::X509(e.to_string()))?;
    Ok(certificate_text(&cert))
}

fn oid_name(oid: &Oid) -> String {
    oid2sn(oid, oid_registry())
        .map(str::to_string)
        .unwrap_or_else(|_| oid.to_id_string())
}

fn certificate_text(cert: &X509Certificate<'_>) -> String {
    let version = cert.version().0;
    let validity = cert.validity();
    let mut lines = vec![
        "Certificate:".to_string(),
        "    Data:".to_string(),
        format!("        Version: {} ({:#x})", version + 1, version),
        format!("        Serial Number: {}", cert.raw_serial_as_string()),
        format!(
            "    Signature Algorithm: {}",
            oid_name(&cert.signature_algorithm.algorithm)
        ),
        format!("        Issuer: {}", cert.issuer()),
        "        Validity".to_string(),
        format!("            Not Before: {}", validity.not_before),
        format!("            Not After : {}", validity.not_after),
        format!("        Subject: {}", cert.subject()),
        "        Subject Public Key Info:".to_string(),
        format!(
            "            Public Key Algorithm: {}",
            oid_name(&cert.public_key().algorithm.algorithm)
        ),
    ];
    let extensions = cert.extensions();
    if !extensions.is_empty() {
        lines.push("        X509v3 extensions:".to_string());
        for ext in extensions {
            let critical = if ext.critical { " critical" } else { "" };
            lines.push(format!("            {}:{}", oid_name(&ext.oid), critical));
        }
    }
    lines.join("\n")
}
