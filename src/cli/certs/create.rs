//! Certificate creation against the platform API
//!
//! Both routines return a [`CertOutcome`]: known rejections come back as
//! [`CertOutcome::Rejected`] values, while anything the platform did not
//! classify surfaces as an [`ApiError`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

use crate::cli::client::ApiClient;
use crate::errors::{ApiError, CreationError};

const CERTS_PATH: &str = "/v3/certs";

/// Certificate registered with the account
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    #[serde(alias = "uid")]
    pub id: String,
    pub cns: Vec<String>,
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
    #[serde(default)]
    pub expiration: Option<DateTime<Utc>>,
    #[serde(default)]
    pub auto_renew: bool,
}

/// Result of asking the platform for a certificate
#[derive(Debug)]
pub enum CertOutcome {
    Created(Certificate),
    Rejected(CreationError),
}

#[derive(Debug, Serialize)]
struct IssueCertRequest<'a> {
    domains: &'a [String],
}

#[derive(Debug, Serialize)]
struct UploadCertRequest {
    ca: String,
    cert: String,
    key: String,
}

/// Request automatic issuance of a certificate covering `cns`
pub async fn create_cert_for_cns(
    client: &ApiClient,
    cns: &[String],
    context: &str,
) -> Result<CertOutcome, ApiError> {
    info!(cns = ?cns, context = %context, "Requesting certificate issuance");

    let response = client.post_json(CERTS_PATH, &IssueCertRequest { domains: cns }).await;
    into_outcome(response, cns, context)
}

/// Upload an existing certificate, private key and CA bundle
pub async fn create_cert_from_files(
    client: &ApiClient,
    key_path: &Path,
    crt_path: &Path,
    ca_path: &Path,
    context: &str,
) -> Result<CertOutcome, ApiError> {
    let request = match read_material(key_path, crt_path, ca_path).await {
        Ok(request) => request,
        Err(err) => return Ok(CertOutcome::Rejected(err)),
    };

    info!(crt = %crt_path.display(), "Uploading custom certificate");

    let response = client.put_json(CERTS_PATH, &request).await;
    into_outcome(response, &[], context)
}

async fn read_material(
    key_path: &Path,
    crt_path: &Path,
    ca_path: &Path,
) -> Result<UploadCertRequest, CreationError> {
    Ok(UploadCertRequest {
        key: read_file(key_path).await?,
        cert: read_file(crt_path).await?,
        ca: read_file(ca_path).await?,
    })
}

async fn read_file(path: &Path) -> Result<String, CreationError> {
    debug!("Reading {}", path.display());
    tokio::fs::read_to_string(path).await.map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            CreationError::FileNotFound { path: path.to_path_buf() }
        } else {
            CreationError::FileRead { path: path.to_path_buf(), source }
        }
    })
}

fn into_outcome(
    response: Result<Certificate, ApiError>,
    cns: &[String],
    context: &str,
) -> Result<CertOutcome, ApiError> {
    let err = match response {
        Ok(cert) => return Ok(CertOutcome::Created(cert)),
        Err(err) => err,
    };

    match CreationError::from_api(&err, cns, context) {
        Some(rejection) => {
            debug!(code = ?err.code(), "Certificate request rejected");
            Ok(CertOutcome::Rejected(rejection))
        }
        None => Err(err),
    }
}
