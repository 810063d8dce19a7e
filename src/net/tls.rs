//! TLS material loading for `start_tls`.

use axum_server::tls_rustls::RustlsConfig;
use std::io::BufReader;
use std::path::Path;

/// Error type for TLS setup.
#[derive(Debug, thiserror::Error)]
pub enum TlsError {
    #[error("certificate file not found: {0:?}")]
    CertNotFound(std::path::PathBuf),

    #[error("private key file not found: {0:?}")]
    KeyNotFound(std::path::PathBuf),

    #[error("no certificate found in PEM data")]
    NoCertificates,

    #[error("no private key found in PEM data")]
    NoPrivateKey,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Load TLS configuration from certificate and key files.
pub async fn load_tls_config(cert_path: &Path, key_path: &Path) -> Result<RustlsConfig, TlsError> {
    if !cert_path.exists() {
        return Err(TlsError::CertNotFound(cert_path.to_path_buf()));
    }
    if !key_path.exists() {
        return Err(TlsError::KeyNotFound(key_path.to_path_buf()));
    }

    let cert = tokio::fs::read(cert_path).await?;
    let key = tokio::fs::read(key_path).await?;
    tls_config_from_pem(cert, key).await
}

/// Build TLS configuration from in-memory PEM data.
pub async fn tls_config_from_pem(cert: Vec<u8>, key: Vec<u8>) -> Result<RustlsConfig, TlsError> {
    check_pem(&cert, &key)?;
    Ok(RustlsConfig::from_pem(cert, key).await?)
}

/// Reject obviously wrong PEM input before rustls does, with a clearer error.
fn check_pem(cert: &[u8], key: &[u8]) -> Result<(), TlsError> {
    let mut reader = BufReader::new(cert);
    let has_cert = rustls_pemfile::certs(&mut reader).any(|c| c.is_ok());
    if !has_cert {
        return Err(TlsError::NoCertificates);
    }

    let mut reader = BufReader::new(key);
    match rustls_pemfile::private_key(&mut reader)? {
        Some(_) => Ok(()),
        None => Err(TlsError::NoPrivateKey),
    }
}
