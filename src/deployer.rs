use alloy::{
    network::{EthereumWallet, ReceiptResponse, TransactionBuilder},
    primitives::{Address, B256},
    providers::{Provider, ProviderBuilder},
    rpc::types::eth::TransactionRequest,
    transports::Transport,
};
use eyre::WrapErr;
use owo_colors::OwoColorize;
use tokio::runtime::Builder;
use url::Url;

use crate::{
    artifact::ContractFactory,
    config::Deploy,
    error::{Error, Result},
    formatting::{deployed_line, format_code_size, format_gas, MAX_INIT_CODE_SIZE},
    project::ProjectConfig,
};

/// Outcome of a confirmed deployment. Not persisted anywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deployment {
    pub contract_name: String,
    pub address: Address,
    pub transaction_hash: B256,
    pub gas_used: u128,
}

pub fn deploy(config: &ProjectConfig, args: &Deploy) -> eyre::Result<Deployment> {
    let runtime = Builder::new_multi_thread().enable_all().build()?;
    runtime
        .block_on(deploy_impl(config, args.network.as_deref(), &args.contract))
        .wrap_err_with(|| format!("failed to deploy {}", args.contract))
}

async fn deploy_impl(
    config: &ProjectConfig,
    network: Option<&str>,
    contract: &str,
) -> Result<Deployment> {
    let factory = ContractFactory::from_artifacts(contract, &config.paths.artifacts)?;
    let profile = config.network(network)?;
    let url: Url = profile.url.parse().map_err(|source| Error::InvalidUrl {
        url: profile.url.clone(),
        source,
    })?;

    let init_code = factory.deploy_code();
    println!(
        "init code size: {}",
        format_code_size(init_code.len(), MAX_INIT_CODE_SIZE)
    );
    println!("deploying to network: {}", profile.name.bright_magenta());
    tracing::debug!(url = %profile.url, "using RPC endpoint");

    let deployment = match profile.wallet()? {
        Some(signer) => {
            let sender = signer.address();
            let provider = ProviderBuilder::new()
                .with_recommended_fillers()
                .wallet(EthereumWallet::from(signer))
                .on_http(url);
            send_deployment(&provider, &factory, sender).await?
        }
        None => {
            // The node signs, so it also fills nonce, gas and chain id.
            let provider = ProviderBuilder::new().on_http(url);
            let sender = provider
                .get_accounts()
                .await?
                .first()
                .copied()
                .ok_or_else(|| Error::NoAccounts(profile.name.clone()))?;
            send_deployment(&provider, &factory, sender).await?
        }
    };

    println!(
        "deployment tx hash: {}",
        deployment.transaction_hash.bright_magenta()
    );
    println!("deployed with {}", format_gas(deployment.gas_used));
    println!("{}", deployed_line(&deployment.contract_name, deployment.address));

    Ok(deployment)
}

/// Sends the create transaction and waits for its receipt.
///
/// There is no timeout: an unreachable node keeps this pending forever.
async fn send_deployment<P, T>(
    provider: &P,
    factory: &ContractFactory,
    sender: Address,
) -> Result<Deployment>
where
    P: Provider<T>,
    T: Transport + Clone,
{
    let tx = TransactionRequest::default()
        .with_from(sender)
        .into_create()
        .with_input(factory.deploy_code().to_vec());

    let pending = provider.send_transaction(tx).await?;
    tracing::info!(tx = %pending.tx_hash(), "waiting for deployment receipt");
    let receipt = pending.get_receipt().await?;

    let transaction_hash = receipt.transaction_hash;
    if !receipt.status() {
        return Err(Error::TransactionReverted(transaction_hash));
    }
    let address = receipt
        .contract_address()
        .ok_or(Error::MissingContractAddress(transaction_hash))?;

    Ok(Deployment {
        contract_name: factory.name.clone(),
        address,
        transaction_hash,
        gas_used: receipt.gas_used,
    })
}
