//! # Web3 Service
//!
//! Contract access for the presale: USDT balance reads, presale terms, the
//! approve-then-buy purchase flow and the SPRAI estimate.
//!
//! Reads go through a [`ChainReader`] (plain JSON-RPC, no wallet needed);
//! purchases go through a [`WalletSigner`] obtained from a [`SignerSource`]
//! at call time, so a wallet connected after the service was built is
//! picked up.
//!
//! ## Purchase flow
//!
//! ```text
//! buy_tokens("100")
//!   |- signer?                  no  -> NoProvider (nothing sent)
//!   |- allowance(owner, presale)
//!   |- allowance < amount?      yes -> approve(presale, amount), wait mined
//!   '- buyTokens(amount)            -> TxHandle (not waited for)
//! ```
//!
//! The approval is for the exact amount; there is no infinite approval and
//! no retry. A failed or rejected approve aborts the purchase.

use alloy::primitives::{Address, Bytes, U256};
use alloy::sol_types::SolCall;
use async_trait::async_trait;
use lib_core::config::Config;
use lib_core::error::{AppError, Result};
use lib_core::model::wallet::{BalanceReader, ZERO_BALANCE};
use shared::dto::{PresaleConfig, TxHandle};
use tracing::{debug, error, info, instrument};

use crate::client::ChainReader;
use crate::contracts::{IPresale, IUsdt};
use crate::signer::{SignerSource, WalletSigner};
use crate::units::{estimate_sprai_amount, format_token_amount, parse_token_amount};

pub struct Web3Service<R, S> {
    reader: R,
    signers: S,
    usdt_contract: Address,
    presale_contract: Option<Address>,
    /// Fixed price (base units per SPRAI) for the local estimate
    token_price: U256,
    chain_id: u64,
}

impl<R, S> Web3Service<R, S>
where
    R: ChainReader,
    S: SignerSource,
{
    pub fn new(config: &Config, reader: R, signers: S) -> Result<Self> {
        let token_price = parse_token_amount(&config.token_price_usdt).map_err(|e| {
            AppError::Config(format!("Invalid token price: {}", e.user_message()))
        })?;

        Ok(Self {
            reader,
            signers,
            usdt_contract: config.usdt_contract,
            presale_contract: config.presale_contract,
            token_price,
            chain_id: config.chain_id(),
        })
    }

    fn require_presale(&self) -> Result<Address> {
        self.presale_contract
            .ok_or_else(|| AppError::Config("Presale contract not configured".to_string()))
    }

    /// USDT balance of `address` as a decimal string.
    ///
    /// Never fails: a malformed address or a read error is logged and
    /// reported as `"0"`.
    #[instrument(skip(self))]
    pub async fn get_usdt_balance(&self, address: &str) -> String {
        let owner = match address.trim().parse::<Address>() {
            Ok(owner) => owner,
            Err(e) => {
                error!("Error fetching USDT balance: invalid address {}: {}", address, e);
                return ZERO_BALANCE.to_string();
            }
        };

        let balance = self
            .reader
            .token_balance(self.usdt_contract, owner)
            .await
            .and_then(format_token_amount);

        match balance {
            Ok(balance) => balance,
            Err(e) => {
                error!("Error fetching USDT balance: {}", e);
                ZERO_BALANCE.to_string()
            }
        }
    }

    /// Current presale terms from the contract.
    #[instrument(skip(self))]
    pub async fn get_presale_config(&self) -> Result<PresaleConfig> {
        let presale = self.require_presale()?;
        let config = self.reader.presale_config(presale).await?;

        Ok(PresaleConfig {
            token_price_usdt: format_token_amount(config.price)?,
            min_purchase_usdt: format_token_amount(config.min_purchase)?,
            max_purchase_usdt: format_token_amount(config.max_purchase)?,
            presale_active: config.active,
        })
    }

    /// Buy SPRAI for `usdt_amount` (decimal string, whole USDT).
    ///
    /// Returns as soon as the `buyTokens` transaction is broadcast.
    #[instrument(skip(self))]
    pub async fn buy_tokens(&self, usdt_amount: &str) -> Result<TxHandle> {
        let signer = self.signers.current_signer().ok_or(AppError::NoProvider)?;
        let presale = self.require_presale()?;

        let amount = parse_token_amount(usdt_amount)?;
        if amount.is_zero() {
            return Err(AppError::InvalidInput(
                "Amount must be greater than zero".to_string(),
            ));
        }

        let owner = signer.address().await?;

        let allowance = self.read_allowance(&signer, owner, presale).await?;
        debug!("USDT allowance for presale: {}", allowance);

        if allowance < amount {
            info!("Approving {} USDT for presale", usdt_amount);
            let approve = IUsdt::approveCall {
                spender: presale,
                amount,
            };
            let approve_hash = signer
                .send_transaction(owner, self.usdt_contract, Bytes::from(approve.abi_encode()))
                .await?;
            signer.wait_for_confirmation(approve_hash).await?;
            debug!("Approval confirmed: {}", approve_hash);
        }

        let buy = IPresale::buyTokensCall { usdtAmount: amount };
        let hash = signer
            .send_transaction(owner, presale, Bytes::from(buy.abi_encode()))
            .await?;

        info!("Purchase submitted: {}", hash);

        Ok(TxHandle {
            hash: hash.to_string(),
            chain_id: Some(self.chain_id),
        })
    }

    async fn read_allowance(
        &self,
        signer: &S::Signer,
        owner: Address,
        presale: Address,
    ) -> Result<U256> {
        let call = IUsdt::allowanceCall {
            owner,
            spender: presale,
        };
        let raw = signer
            .call(self.usdt_contract, Bytes::from(call.abi_encode()))
            .await?;

        IUsdt::allowanceCall::abi_decode_returns(&raw)
            .map_err(|e| AppError::Decoding(format!("Invalid allowance response: {}", e)))
    }

    /// Local SPRAI estimate at the configured fixed price, two decimals.
    pub fn calculate_sprai_amount(&self, usdt_amount: &str) -> String {
        estimate_sprai_amount(usdt_amount, self.token_price)
    }

    /// SPRAI amount as computed by the presale contract itself.
    #[instrument(skip(self))]
    pub async fn quote_sprai_amount(&self, usdt_amount: &str) -> Result<String> {
        let presale = self.require_presale()?;
        let amount = parse_token_amount(usdt_amount)?;
        let sprai = self.reader.quote_sprai(presale, amount).await?;
        format_token_amount(sprai)
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }
}

#[async_trait(?Send)]
impl<R, S> BalanceReader for Web3Service<R, S>
where
    R: ChainReader,
    S: SignerSource,
{
    async fn usdt_balance(&self, address: &str) -> Result<String> {
        Ok(self.get_usdt_balance(address).await)
    }
}

/// Check a purchase amount against the presale terms before asking the
/// wallet to sign anything.
///
/// A `max_purchase_usdt` of zero means no upper limit.
pub fn check_purchase_amount(usdt_amount: &str, terms: &PresaleConfig) -> Result<U256> {
    if !terms.presale_active {
        return Err(AppError::InvalidInput("Presale is not active".to_string()));
    }

    let amount = parse_token_amount(usdt_amount)?;
    let min = parse_token_amount(&terms.min_purchase_usdt)?;
    let max = parse_token_amount(&terms.max_purchase_usdt)?;

    if amount.is_zero() {
        return Err(AppError::InvalidInput(
            "Amount must be greater than zero".to_string(),
        ));
    }
    if amount < min {
        return Err(AppError::InvalidInput(format!(
            "Minimum purchase is {} USDT",
            terms.min_purchase_usdt
        )));
    }
    if !max.is_zero() && amount > max {
        return Err(AppError::InvalidInput(format!(
            "Maximum purchase is {} USDT",
            terms.max_purchase_usdt
        )));
    }

    Ok(amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::OnChainPresaleConfig;
    use crate::signer::WalletSigner;
    use alloy::primitives::TxHash;
    use lib_core::model::wallet::refresh_balances;
    use lib_core::model::WalletAction;
    use std::cell::RefCell;
    use std::rc::Rc;

    const USDT: &str = "0x337610d27c682E347C9cD60BD4b3b107C9d34dDd";
    const PRESALE: &str = "0x8ba1f109551bD432803012645Ac136ddd64DBA72";
    const BUYER: &str = "0x71C7656EC7ab88b098defB751B7401B5f6d8976F";

    type Log = Rc<RefCell<Vec<String>>>;

    fn tokens(n: u64) -> U256 {
        U256::from(n) * U256::from(10u64).pow(U256::from(18u64))
    }

    fn config(presale: Option<&str>) -> Config {
        Config::from_lookup(|name| match name {
            "PRESALE_USDT_CONTRACT" => Some(USDT.to_string()),
            "PRESALE_CONTRACT" => presale.map(str::to_string),
            _ => None,
        })
        .unwrap()
    }

    struct FakeReader {
        log: Log,
        balance: Result<U256>,
    }

    #[async_trait(?Send)]
    impl ChainReader for FakeReader {
        async fn token_balance(&self, token: Address, owner: Address) -> Result<U256> {
            self.log
                .borrow_mut()
                .push(format!("balanceOf({}, {})", token, owner));
            self.balance.clone()
        }

        async fn presale_config(&self, _presale: Address) -> Result<OnChainPresaleConfig> {
            self.log.borrow_mut().push("getConfig".to_string());
            Ok(OnChainPresaleConfig {
                price: tokens(1) / U256::from(100u64),
                min_purchase: tokens(10),
                max_purchase: tokens(5000),
                active: true,
            })
        }

        async fn quote_sprai(&self, _presale: Address, usdt_amount: U256) -> Result<U256> {
            self.log.borrow_mut().push("calculateSpraiAmount".to_string());
            Ok(usdt_amount * U256::from(100u64))
        }
    }

    #[derive(Clone)]
    struct FakeSigner {
        log: Log,
        allowance: U256,
        fail_approve: bool,
    }

    #[async_trait(?Send)]
    impl WalletSigner for FakeSigner {
        async fn address(&self) -> Result<Address> {
            Ok(BUYER.parse().unwrap())
        }

        async fn call(&self, _to: Address, data: Bytes) -> Result<Bytes> {
            assert_eq!(&data[..4], IUsdt::allowanceCall::SELECTOR.as_slice());
            self.log.borrow_mut().push("allowance".to_string());
            Ok(Bytes::from(self.allowance.to_be_bytes::<32>().to_vec()))
        }

        async fn send_transaction(&self, from: Address, to: Address, data: Bytes) -> Result<TxHash> {
            assert_eq!(from, BUYER.parse::<Address>().unwrap());
            let selector = &data[..4];
            if selector == IUsdt::approveCall::SELECTOR.as_slice() {
                assert_eq!(to, USDT.parse::<Address>().unwrap());
                self.log.borrow_mut().push("approve".to_string());
                if self.fail_approve {
                    return Err(AppError::Transaction("User rejected the request.".to_string()));
                }
                Ok(TxHash::repeat_byte(0xaa))
            } else if selector == IPresale::buyTokensCall::SELECTOR.as_slice() {
                assert_eq!(to, PRESALE.parse::<Address>().unwrap());
                self.log.borrow_mut().push("buyTokens".to_string());
                Ok(TxHash::repeat_byte(0xbb))
            } else {
                panic!("unexpected calldata {:?}", data);
            }
        }

        async fn wait_for_confirmation(&self, hash: TxHash) -> Result<()> {
            self.log.borrow_mut().push(format!("wait({})", hash));
            Ok(())
        }
    }

    struct FakeSigners(Option<FakeSigner>);

    impl SignerSource for FakeSigners {
        type Signer = FakeSigner;

        fn current_signer(&self) -> Option<FakeSigner> {
            self.0.clone()
        }
    }

    fn service(
        log: &Log,
        allowance: Option<U256>,
        fail_approve: bool,
    ) -> Web3Service<FakeReader, FakeSigners> {
        let reader = FakeReader {
            log: log.clone(),
            balance: Ok(tokens(125) + tokens(1) / U256::from(2u64)),
        };
        let signer = allowance.map(|allowance| FakeSigner {
            log: log.clone(),
            allowance,
            fail_approve,
        });
        Web3Service::new(&config(Some(PRESALE)), reader, FakeSigners(signer)).unwrap()
    }

    #[tokio::test]
    async fn test_buy_approves_and_confirms_before_buying() {
        let log: Log = Rc::default();
        let service = service(&log, Some(U256::ZERO), false);

        let handle = service.buy_tokens("100").await.unwrap();

        let approve_wait = format!("wait({})", TxHash::repeat_byte(0xaa));
        assert_eq!(
            *log.borrow(),
            vec!["allowance", "approve", approve_wait.as_str(), "buyTokens"]
        );
        assert_eq!(handle.hash, TxHash::repeat_byte(0xbb).to_string());
        assert_eq!(handle.chain_id, Some(97));
    }

    #[tokio::test]
    async fn test_buy_with_sufficient_allowance_skips_approve() {
        let log: Log = Rc::default();
        let service = service(&log, Some(tokens(500)), false);

        service.buy_tokens("100").await.unwrap();

        assert_eq!(*log.borrow(), vec!["allowance", "buyTokens"]);
    }

    #[tokio::test]
    async fn test_buy_exact_allowance_skips_approve() {
        let log: Log = Rc::default();
        let service = service(&log, Some(tokens(100)), false);

        service.buy_tokens("100").await.unwrap();

        assert_eq!(*log.borrow(), vec!["allowance", "buyTokens"]);
    }

    #[tokio::test]
    async fn test_buy_without_wallet_fails_before_any_call() {
        let log: Log = Rc::default();
        let service = service(&log, None, false);

        let err = service.buy_tokens("100").await.unwrap_err();

        assert_eq!(err, AppError::NoProvider);
        assert!(log.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_failed_approve_aborts_purchase() {
        let log: Log = Rc::default();
        let service = service(&log, Some(U256::ZERO), true);

        let err = service.buy_tokens("100").await.unwrap_err();

        assert!(matches!(err, AppError::Transaction(_)));
        assert_eq!(*log.borrow(), vec!["allowance", "approve"]);
    }

    #[tokio::test]
    async fn test_buy_rejects_bad_amounts() {
        let log: Log = Rc::default();
        let service = service(&log, Some(U256::ZERO), false);

        for amount in ["0", "abc", "-1", ""] {
            let err = service.buy_tokens(amount).await.unwrap_err();
            assert!(matches!(err, AppError::InvalidInput(_)), "{}", amount);
        }
        assert!(log.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_buy_without_presale_contract() {
        let log: Log = Rc::default();
        let signer = FakeSigner {
            log: log.clone(),
            allowance: U256::ZERO,
            fail_approve: false,
        };
        let reader = FakeReader {
            log: log.clone(),
            balance: Ok(U256::ZERO),
        };
        let service = Web3Service::new(&config(None), reader, FakeSigners(Some(signer))).unwrap();

        let err = service.buy_tokens("100").await.unwrap_err();

        assert!(matches!(err, AppError::Config(_)));
        assert!(log.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_usdt_balance() {
        let log: Log = Rc::default();
        let service = service(&log, None, false);

        assert_eq!(service.get_usdt_balance(BUYER).await, "125.5");
    }

    #[tokio::test]
    async fn test_usdt_balance_malformed_address_is_zero() {
        let log: Log = Rc::default();
        let service = service(&log, None, false);

        assert_eq!(service.get_usdt_balance("0xnot-an-address").await, "0");
        assert!(log.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_usdt_balance_read_error_is_zero() {
        let log: Log = Rc::default();
        let reader = FakeReader {
            log: log.clone(),
            balance: Err(AppError::Rpc("connection refused".to_string())),
        };
        let service =
            Web3Service::new(&config(Some(PRESALE)), reader, FakeSigners(None)).unwrap();

        assert_eq!(service.get_usdt_balance(BUYER).await, "0");
        assert_eq!(log.borrow().len(), 1);
    }

    #[tokio::test]
    async fn test_refresh_balances_through_service() {
        let log: Log = Rc::default();
        let service = service(&log, None, false);

        let action = refresh_balances(&service, BUYER).await.unwrap();

        assert_eq!(
            action,
            WalletAction::BalancesRefreshed {
                usdt_balance: "125.5".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_presale_config() {
        let log: Log = Rc::default();
        let service = service(&log, None, false);

        let config = service.get_presale_config().await.unwrap();

        assert_eq!(
            config,
            PresaleConfig {
                token_price_usdt: "0.01".to_string(),
                min_purchase_usdt: "10.0".to_string(),
                max_purchase_usdt: "5000.0".to_string(),
                presale_active: true,
            }
        );
    }

    #[tokio::test]
    async fn test_presale_config_requires_contract() {
        let log: Log = Rc::default();
        let reader = FakeReader {
            log: log.clone(),
            balance: Ok(U256::ZERO),
        };
        let service = Web3Service::new(&config(None), reader, FakeSigners(None)).unwrap();

        assert_eq!(
            service.get_presale_config().await,
            Err(AppError::Config("Presale contract not configured".to_string()))
        );
        assert!(log.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_quote_from_contract() {
        let log: Log = Rc::default();
        let service = service(&log, None, false);

        assert_eq!(service.quote_sprai_amount("1.5").await.unwrap(), "150.0");
    }

    #[test]
    fn test_check_purchase_amount() {
        let terms = PresaleConfig {
            token_price_usdt: "0.01".to_string(),
            min_purchase_usdt: "10.0".to_string(),
            max_purchase_usdt: "5000.0".to_string(),
            presale_active: true,
        };

        assert_eq!(check_purchase_amount("100", &terms).unwrap(), tokens(100));
        assert_eq!(check_purchase_amount("10", &terms).unwrap(), tokens(10));
        assert_eq!(check_purchase_amount("5000", &terms).unwrap(), tokens(5000));
        assert_eq!(
            check_purchase_amount("9.99", &terms),
            Err(AppError::InvalidInput("Minimum purchase is 10.0 USDT".to_string()))
        );
        assert_eq!(
            check_purchase_amount("5000.01", &terms),
            Err(AppError::InvalidInput("Maximum purchase is 5000.0 USDT".to_string()))
        );
        assert!(matches!(
            check_purchase_amount("lots", &terms),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_check_purchase_amount_inactive_or_uncapped() {
        let mut terms = PresaleConfig {
            token_price_usdt: "0.01".to_string(),
            min_purchase_usdt: "0.0".to_string(),
            max_purchase_usdt: "0.0".to_string(),
            presale_active: true,
        };
        assert!(check_purchase_amount("1000000", &terms).is_ok());
        assert!(check_purchase_amount("0", &terms).is_err());

        terms.presale_active = false;
        assert_eq!(
            check_purchase_amount("100", &terms),
            Err(AppError::InvalidInput("Presale is not active".to_string()))
        );
    }

    #[test]
    fn test_calculate_sprai_amount_uses_configured_price() {
        let log: Log = Rc::default();
        let service = service(&log, None, false);

        assert_eq!(service.calculate_sprai_amount("100"), "10000.00");
        assert_eq!(service.calculate_sprai_amount("not a number"), "0.00");
        assert!(log.borrow().is_empty());
    }
}
