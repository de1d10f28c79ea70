//! Transaction, order and invocation views.

use serde::{Deserialize, Serialize};

use crate::{Address, Digest, OptionalAsset, PublicKey, Recipient, RideObject, RideValue};

/// A payment attached to an invocation.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct AttachedPayment {
    /// Paid asset.
    pub asset: OptionalAsset,
    /// Paid amount.
    pub amount: i64,
}

impl AttachedPayment {
    /// Constructs a payment.
    pub fn new(asset: OptionalAsset, amount: i64) -> Self {
        AttachedPayment { asset, amount }
    }

    /// Builds the `AttachedPayment` object.
    pub fn to_ride_object(&self) -> RideObject {
        RideObject::new("AttachedPayment")
            .with("assetId", self.asset)
            .with("amount", self.amount)
    }
}

/// The `i` object of a callable function.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Invocation {
    /// Address that called the function.
    pub caller: Address,
    /// Public key of the caller.
    pub caller_public_key: PublicKey,
    /// Account that signed the top-level transaction.
    pub origin_caller: Address,
    /// Public key of the origin caller.
    pub origin_caller_public_key: PublicKey,
    /// Attached payments.
    pub payments: Vec<AttachedPayment>,
    /// Id of the governing invoke transaction.
    pub transaction_id: Option<Digest>,
    /// Fee of the governing transaction.
    pub fee: i64,
    /// Asset the fee is paid in.
    pub fee_asset: OptionalAsset,
}

impl Invocation {
    /// Builds the `Invocation` object.
    pub fn to_ride_object(&self) -> RideObject {
        let payments = self
            .payments
            .iter()
            .map(|payment| RideValue::Object(payment.to_ride_object()))
            .collect();
        RideObject::new("Invocation")
            .with("caller", self.caller)
            .with("callerPublicKey", self.caller_public_key)
            .with("originCaller", self.origin_caller)
            .with("originCallerPublicKey", self.origin_caller_public_key)
            .with("payments", RideValue::List(payments))
            .with(
                "payment",
                self.payments.first().map(AttachedPayment::to_ride_object),
            )
            .with("transactionId", self.transaction_id)
            .with("fee", self.fee)
            .with("feeAssetId", self.fee_asset)
    }
}

/// An invoke script transaction.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct InvokeScriptTransaction {
    /// Transaction id.
    pub id: Digest,
    /// Sender address.
    pub sender: Address,
    /// Sender public key.
    pub sender_public_key: PublicKey,
    /// Invoked dApp.
    pub dapp: Recipient,
    /// Name of the callable function.
    pub function: String,
    /// Attached payments.
    pub payments: Vec<AttachedPayment>,
    /// Transaction fee.
    pub fee: i64,
    /// Asset the fee is paid in.
    pub fee_asset: OptionalAsset,
    /// Timestamp in milliseconds.
    pub timestamp: u64,
    /// Transaction version.
    pub version: u8,
    /// Signatures.
    pub proofs: Vec<Vec<u8>>,
}

impl InvokeScriptTransaction {
    /// The invocation seen by the top-level callable.
    pub fn invocation(&self) -> Invocation {
        Invocation {
            caller: self.sender,
            caller_public_key: self.sender_public_key,
            origin_caller: self.sender,
            origin_caller_public_key: self.sender_public_key,
            payments: self.payments.clone(),
            transaction_id: Some(self.id),
            fee: self.fee,
            fee_asset: self.fee_asset,
        }
    }

    /// Builds the `InvokeScriptTransaction` object.
    pub fn to_ride_object(&self) -> RideObject {
        let payments = self
            .payments
            .iter()
            .map(|payment| RideValue::Object(payment.to_ride_object()))
            .collect();
        RideObject::new("InvokeScriptTransaction")
            .with("id", self.id)
            .with("sender", self.sender)
            .with("senderPublicKey", self.sender_public_key)
            .with("dApp", self.dapp.clone())
            .with("function", self.function.as_str())
            .with("payments", RideValue::List(payments))
            .with("fee", self.fee)
            .with("feeAssetId", self.fee_asset)
            .with("timestamp", self.timestamp)
            .with("version", i64::from(self.version))
            .with("proofs", proofs(&self.proofs))
    }
}

/// Side of an exchange order.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum OrderType {
    /// Buy the amount asset.
    Buy,
    /// Sell the amount asset.
    Sell,
}

/// An exchange order, the subject of matcher account scripts.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Order {
    /// Order id.
    pub id: Digest,
    /// Sender address.
    pub sender: Address,
    /// Sender public key.
    pub sender_public_key: PublicKey,
    /// Matcher public key.
    pub matcher_public_key: PublicKey,
    /// Amount asset of the pair.
    pub amount_asset: OptionalAsset,
    /// Price asset of the pair.
    pub price_asset: OptionalAsset,
    /// Order side.
    pub order_type: OrderType,
    /// Price.
    pub price: i64,
    /// Amount.
    pub amount: i64,
    /// Creation timestamp.
    pub timestamp: u64,
    /// Expiration timestamp.
    pub expiration: u64,
    /// Matcher fee.
    pub matcher_fee: i64,
    /// Asset the matcher fee is paid in.
    pub matcher_fee_asset: OptionalAsset,
    /// Signatures.
    pub proofs: Vec<Vec<u8>>,
}

impl Order {
    /// Builds the `Order` object.
    pub fn to_ride_object(&self) -> RideObject {
        let asset_pair = RideObject::new("AssetPair")
            .with("amountAsset", self.amount_asset)
            .with("priceAsset", self.price_asset);
        let order_type = match self.order_type {
            OrderType::Buy => RideObject::new("Buy"),
            OrderType::Sell => RideObject::new("Sell"),
        };
        RideObject::new("Order")
            .with("id", self.id)
            .with("sender", self.sender)
            .with("senderPublicKey", self.sender_public_key)
            .with("matcherPublicKey", self.matcher_public_key)
            .with("assetPair", asset_pair)
            .with("orderType", order_type)
            .with("price", self.price)
            .with("amount", self.amount)
            .with("timestamp", self.timestamp)
            .with("expiration", self.expiration)
            .with("matcherFee", self.matcher_fee)
            .with("matcherFeeAssetId", self.matcher_fee_asset)
            .with("proofs", proofs(&self.proofs))
    }
}

fn proofs(proofs: &[Vec<u8>]) -> RideValue {
    RideValue::List(proofs.iter().cloned().map(RideValue::Bytes).collect())
}
