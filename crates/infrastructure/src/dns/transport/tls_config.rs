//! Shared rustls client configurations.
//!
//! Built once per verification mode and reused for every DoT and DoQ query.

use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{ClientConfig, DigitallySignedStruct, RootCertStore, SignatureScheme};
use std::sync::{Arc, LazyLock, Once};

/// ALPN token for DNS-over-QUIC (RFC 9250 §4.1.1)
pub const DOQ_ALPN: &[u8] = b"doq";

static INSTALL_PROVIDER: Once = Once::new();

/// Installs aws-lc-rs as the process-wide crypto provider if none is set.
pub fn ensure_crypto_provider() {
    INSTALL_PROVIDER.call_once(|| {
        let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();
    });
}

fn build_config(insecure: bool, alpn: Option<&[u8]>) -> ClientConfig {
    ensure_crypto_provider();

    let mut config = if insecure {
        ClientConfig::builder()
            .dangerous()
            .with_custom_certificate_verifier(SkipServerVerification::new())
            .with_no_client_auth()
    } else {
        let mut root_store = RootCertStore::empty();
        root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
        ClientConfig::builder()
            .with_root_certificates(root_store)
            .with_no_client_auth()
    };

    if let Some(alpn) = alpn {
        config.alpn_protocols = vec![alpn.to_vec()];
    }
    config
}

static VERIFIED_TLS: LazyLock<Arc<ClientConfig>> =
    LazyLock::new(|| Arc::new(build_config(false, None)));
static INSECURE_TLS: LazyLock<Arc<ClientConfig>> =
    LazyLock::new(|| Arc::new(build_config(true, None)));
static VERIFIED_DOQ: LazyLock<Arc<ClientConfig>> =
    LazyLock::new(|| Arc::new(build_config(false, Some(DOQ_ALPN))));
static INSECURE_DOQ: LazyLock<Arc<ClientConfig>> =
    LazyLock::new(|| Arc::new(build_config(true, Some(DOQ_ALPN))));

pub fn tls_client_config(insecure: bool) -> Arc<ClientConfig> {
    if insecure {
        Arc::clone(&INSECURE_TLS)
    } else {
        Arc::clone(&VERIFIED_TLS)
    }
}

pub fn doq_client_config(insecure: bool) -> Arc<ClientConfig> {
    if insecure {
        Arc::clone(&INSECURE_DOQ)
    } else {
        Arc::clone(&VERIFIED_DOQ)
    }
}

/// Accepts any server certificate. Only used when the caller explicitly
/// disables verification.
#[derive(Debug)]
struct SkipServerVerification;

impl SkipServerVerification {
    fn new() -> Arc<Self> {
        Arc::new(Self)
    }
}

impl ServerCertVerifier for SkipServerVerification {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn verify_tls13_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        vec![
            SignatureScheme::RSA_PKCS1_SHA256,
            SignatureScheme::RSA_PKCS1_SHA384,
            SignatureScheme::RSA_PKCS1_SHA512,
            SignatureScheme::RSA_PSS_SHA256,
            SignatureScheme::RSA_PSS_SHA384,
            SignatureScheme::RSA_PSS_SHA512,
            SignatureScheme::ECDSA_NISTP256_SHA256,
            SignatureScheme::ECDSA_NISTP384_SHA384,
            SignatureScheme::ED25519,
        ]
    }
}
