//! Payment method tools: lookup, vaulting, verification, deletion and client tokens.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::clients::graphql::DEFAULT_MAX_RETRIES;
use crate::normalize::{ExtractionRule, Shape, ToolContext};
use crate::tools::operation::{optional, required, Invocation, Operation};
use crate::tools::{InputVariables, NodeVariables, ToolError};

pub(crate) static FETCH_PAYMENT_METHOD: Operation = Operation {
    name: "fetch_payment_method",
    document: concat!(
        "query FetchPaymentMethod($id: ID!) { node(id: $id) { __typename ... on PaymentMethod { ",
        payment_method_fields!(),
        " } } }"
    ),
    rule: ExtractionRule::node(&["node"], "payment_method", "Payment method")
        .typed("PaymentMethod")
        .shaped(Shape::PaymentMethod),
    context: ToolContext::Lookup,
    max_retries: DEFAULT_MAX_RETRIES,
};

pub(crate) static VAULT_PAYMENT_METHOD: Operation = Operation {
    name: "vault_payment_method",
    document: concat!(
        "mutation VaultPaymentMethod($input: VaultPaymentMethodInput!) { ",
        "vaultPaymentMethod(input: $input) { paymentMethod { ",
        payment_method_fields!(),
        " } verification { ",
        verification_fields!(),
        " } } }"
    ),
    rule: ExtractionRule::node(&["vaultPaymentMethod"], "payment_method", "Payment method")
        .shaped(Shape::Vault),
    context: ToolContext::PaymentMethod,
    max_retries: DEFAULT_MAX_RETRIES,
};

pub(crate) static VERIFY_PAYMENT_METHOD: Operation = Operation {
    name: "verify_payment_method",
    document: concat!(
        "mutation VerifyPaymentMethod($input: VerifyPaymentMethodInput!) { ",
        "verifyPaymentMethod(input: $input) { verification { ",
        verification_fields!(),
        " } } }"
    ),
    rule: ExtractionRule::node(
        &["verifyPaymentMethod", "verification"],
        "verification",
        "Verification",
    )
    .shaped(Shape::Verification),
    context: ToolContext::PaymentMethod,
    max_retries: DEFAULT_MAX_RETRIES,
};

pub(crate) static DELETE_PAYMENT_METHOD: Operation = Operation {
    name: "delete_payment_method",
    document: "mutation DeletePaymentMethodFromVault($input: DeletePaymentMethodFromVaultInput!) { \
deletePaymentMethodFromVault(input: $input) { clientMutationId } }",
    rule: ExtractionRule::node(
        &["deletePaymentMethodFromVault"],
        "payment_method_id",
        "Payment method",
    )
    .shaped(Shape::Acknowledged),
    context: ToolContext::Lookup,
    max_retries: DEFAULT_MAX_RETRIES,
};

pub(crate) static CREATE_CLIENT_TOKEN: Operation = Operation {
    name: "create_client_token",
    document: "mutation CreateClientToken($input: CreateClientTokenInput) { \
createClientToken(input: $input) { clientToken } }",
    rule: ExtractionRule::node(&["createClientToken", "clientToken"], "client_token", "Client token"),
    context: ToolContext::Customer,
    max_retries: DEFAULT_MAX_RETRIES,
};

/// Arguments naming a single payment method.
#[derive(Clone, Debug, Deserialize)]
pub struct PaymentMethodIdArgs {
    /// GraphQL ID of the payment method.
    pub payment_method_id: String,
}

/// Arguments of `vault_payment_method`.
#[derive(Clone, Debug, Deserialize)]
pub struct VaultArgs {
    /// Single-use payment method ID (nonce) to vault.
    pub payment_method_id: String,
    /// Customer to attach the payment method to.
    #[serde(default)]
    pub customer_id: Option<String>,
    /// Run a verification before vaulting.
    #[serde(default)]
    pub verify: bool,
    /// Merchant account used for the verification.
    #[serde(default)]
    pub merchant_account_id: Option<String>,
}

/// Arguments of `verify_payment_method`.
#[derive(Clone, Debug, Deserialize)]
pub struct VerifyArgs {
    /// GraphQL ID of the vaulted payment method.
    pub payment_method_id: String,
    /// Merchant account used for the verification.
    #[serde(default)]
    pub merchant_account_id: Option<String>,
}

/// Arguments of `create_client_token`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ClientTokenArgs {
    /// Customer whose vaulted payment methods the token exposes.
    #[serde(default)]
    pub customer_id: Option<String>,
    /// Merchant account the token is scoped to.
    #[serde(default)]
    pub merchant_account_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VerificationOptions {
    merchant_account_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VaultInput {
    payment_method_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    customer_id: Option<String>,
    verify: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    verification: Option<VerificationOptions>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VerifyInput {
    payment_method_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    merchant_account_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DeleteInput {
    payment_method_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ClientTokenInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    customer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    merchant_account_id: Option<String>,
}

pub(crate) fn fetch_payment_method(args: &PaymentMethodIdArgs) -> Result<Invocation, ToolError> {
    let variables = NodeVariables {
        id: required("payment_method_id", &args.payment_method_id)?,
    };
    Ok(FETCH_PAYMENT_METHOD.invoke(&variables))
}

pub(crate) fn vault_payment_method(args: &VaultArgs) -> Result<Invocation, ToolError> {
    let verification = optional(args.merchant_account_id.as_deref())
        .filter(|_| args.verify)
        .map(|merchant_account_id| VerificationOptions {
            merchant_account_id,
        });
    let input = VaultInput {
        payment_method_id: required("payment_method_id", &args.payment_method_id)?,
        customer_id: optional(args.customer_id.as_deref()),
        verify: args.verify,
        verification,
    };
    Ok(VAULT_PAYMENT_METHOD.invoke(&InputVariables { input }))
}

pub(crate) fn verify_payment_method(args: &VerifyArgs) -> Result<Invocation, ToolError> {
    let input = VerifyInput {
        payment_method_id: required("payment_method_id", &args.payment_method_id)?,
        merchant_account_id: optional(args.merchant_account_id.as_deref()),
    };
    Ok(VERIFY_PAYMENT_METHOD.invoke(&InputVariables { input }))
}

pub(crate) fn delete_payment_method(args: &PaymentMethodIdArgs) -> Result<Invocation, ToolError> {
    let payment_method_id = required("payment_method_id", &args.payment_method_id)?;
    let echo = Value::String(payment_method_id.clone());
    let input = DeleteInput { payment_method_id };
    Ok(DELETE_PAYMENT_METHOD
        .invoke(&InputVariables { input })
        .echoing(echo))
}

pub(crate) fn create_client_token(args: &ClientTokenArgs) -> Invocation {
    let input = ClientTokenInput {
        customer_id: optional(args.customer_id.as_deref()),
        merchant_account_id: optional(args.merchant_account_id.as_deref()),
    };
    CREATE_CLIENT_TOKEN.invoke(&InputVariables { input })
}
