use alloy::signers::local::PrivateKeySigner;

use crate::{
    error::{Error, Result},
    network::{Accounts, NetworkProfile},
};

impl NetworkProfile {
    /// Builds the signer for this network's first configured private key.
    ///
    /// Returns `None` for networks whose node signs on our behalf. This is
    /// the first place a malformed key is noticed.
    pub fn wallet(&self) -> Result<Option<PrivateKeySigner>> {
        let keys = match &self.accounts {
            Accounts::Remote => return Ok(None),
            Accounts::PrivateKeys(keys) => keys,
        };

        let key = keys
            .first()
            .ok_or_else(|| Error::NoAccounts(self.name.clone()))?;
        let signer = key
            .parse::<PrivateKeySigner>()
            .map_err(|e| Error::InvalidCredential {
                network: self.name.clone(),
                reason: e.to_string(),
            })?;

        Ok(Some(signer))
    }
}
