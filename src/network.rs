use url::Url;

/// A named RPC endpoint together with the accounts used to sign on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkProfile {
    pub name: String,
    pub url: String,
    pub accounts: Accounts,
}

/// Where transactions sent to a network get their signature from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Accounts {
    /// The node signs with its own unlocked accounts.
    Remote,
    /// Hex-encoded private keys, kept exactly as configured.
    PrivateKeys(Vec<String>),
}

impl NetworkProfile {
    pub fn new(name: impl Into<String>, url: impl Into<String>, accounts: Accounts) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            accounts,
        }
    }

    /// The RPC url with a trailing project id masked, e.g. `…/v3/<redacted>`.
    pub fn redacted_url(&self) -> String {
        let Ok(url) = Url::parse(&self.url) else {
            return "<invalid url>".to_owned();
        };
        let segments = url.path_segments().map_or(0, Iterator::count);
        if segments < 2 {
            return self.url.clone();
        }

        match self.url.rsplit_once('/') {
            Some((prefix, "")) => format!("{prefix}/<unset>"),
            Some((prefix, _)) => format!("{prefix}/<redacted>"),
            None => self.url.clone(),
        }
    }
}

impl Accounts {
    /// Short human readable description that never reveals key material.
    pub fn describe(&self) -> String {
        match self {
            Self::Remote => "node accounts".to_owned(),
            Self::PrivateKeys(keys) => {
                let set = keys.iter().filter(|k| k.len() > 2).count();
                format!("{} private key(s), {set} set", keys.len())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Accounts, NetworkProfile};

    fn url(url: &str) -> String {
        NetworkProfile::new("net", url, Accounts::Remote).redacted_url()
    }

    #[test]
    fn redacts_project_id() {
        assert_eq!(
            "https://goerli.infura.io/v3/<redacted>",
            url("https://goerli.infura.io/v3/abc123")
        );
        assert_eq!(
            "https://goerli.infura.io/v3/<unset>",
            url("https://goerli.infura.io/v3/")
        );
    }

    #[test]
    fn keeps_urls_without_project_id() {
        assert_eq!(
            "https://data-seed-prebsc-1-s1.binance.org:8545",
            url("https://data-seed-prebsc-1-s1.binance.org:8545")
        );
        assert_eq!("http://127.0.0.1:8545", url("http://127.0.0.1:8545"));
        assert_eq!("<invalid url>", url("not a url"));
    }

    #[test]
    fn describes_without_secrets() {
        let accounts = Accounts::PrivateKeys(vec!["0xdeadbeef".to_owned(), "0x".to_owned()]);
        let text = accounts.describe();
        assert_eq!("2 private key(s), 1 set", text);
        assert!(!text.contains("deadbeef"));
        assert_eq!("node accounts", Accounts::Remote.describe());
    }
}
