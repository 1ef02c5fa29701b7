use decide::{
    AuthorityClient, Ciphertext, Error, GroupParams, HexUint, PartialDecryptionBatch,
};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Clone)]
struct ShareResp {
    y: HexUint,
}

#[derive(Serialize, Debug)]
struct DecryptReq<'a> {
    ciphertexts: &'a [Ciphertext],
}

/// An authority reached over HTTP.
///
/// `POST {url}/authority/{voting}/share` with the group parameters answers
/// `{"y": hex}`; `POST {url}/authority/{voting}/decrypt` with the ciphertext
/// batch answers a `PartialDecryptionBatch`.
pub struct RestAuthority {
    base_uri: String,
    client: reqwest::blocking::Client,
}

impl RestAuthority {
    pub fn new(base_uri: &str, timeout: Duration) -> Result<Self, Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Authority(e.to_string()))?;
        Ok(RestAuthority {
            base_uri: base_uri.trim_end_matches('/').to_owned(),
            client,
        })
    }

    fn post<Req: Serialize + ?Sized, Resp: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &Req,
    ) -> Result<Resp, reqwest::Error> {
        let full_uri = format!("{}{}", self.base_uri, path);
        log::debug!("POST {}", full_uri);
        self.client
            .post(&full_uri)
            .json(body)
            .send()?
            .error_for_status()?
            .json()
    }
}

impl AuthorityClient for RestAuthority {
    fn get_share(&self, voting_id: Uuid, group: &GroupParams) -> Result<BigUint, Error> {
        let path = format!("/authority/{}/share", voting_id);
        let resp: ShareResp = self
            .post(&path, group)
            .map_err(|e| Error::Authority(format!("{}: {}", self.base_uri, e)))?;
        Ok(resp.y.into())
    }

    fn partial_decrypt(
        &self,
        voting_id: Uuid,
        ciphertexts: &[Ciphertext],
    ) -> Result<PartialDecryptionBatch, Error> {
        let path = format!("/authority/{}/decrypt", voting_id);
        self.post(&path, &DecryptReq { ciphertexts })
            .map_err(|e| Error::Authority(format!("{}: {}", self.base_uri, e)))
    }
}
