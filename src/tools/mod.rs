//! The tool catalog.
//!
//! Every tool is a fixed GraphQL document plus typed arguments. A call
//! decodes the arguments, checks preconditions, executes the document and
//! normalizes the result into a [`ToolEnvelope`] rendered as JSON text.
//!
//! # Example
//!
//! ```rust,ignore
//! use braintree_bridge::{BraintreeConfig, ToolCatalog};
//! use serde_json::json;
//!
//! let catalog = ToolCatalog::new(&BraintreeConfig::from_env()?)?;
//!
//! let output = catalog
//!     .call("search_transactions", json!({"date": "2024-01-01"}))
//!     .await;
//! println!("{output}");
//! ```

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::clients::graphql::GraphqlClient;
use crate::config::BraintreeConfig;
use crate::error::ConfigError;
use crate::normalize::{normalize, ToolEnvelope};

// Field selections shared by the documents below.

macro_rules! transaction_fields {
    () => {
        "id legacyId status createdAt orderId merchantAccountId \
amount { value currencyCode } customer { id } \
paymentMethodSnapshot { __typename ... on CreditCardDetails { brandCode last4 expirationMonth expirationYear } }"
    };
}

macro_rules! refund_fields {
    () => {
        "id legacyId status createdAt orderId amount { value currencyCode } \
refundedTransaction { id legacyId }"
    };
}

macro_rules! payment_method_fields {
    () => {
        "id legacyId usage createdAt customer { id } details { __typename \
... on CreditCardDetails { brandCode last4 expirationMonth expirationYear cardholderName } \
... on PayPalAccountDetails { email payerId } \
... on VenmoAccountDetails { username venmoUserId } \
... on UsBankAccountDetails { accountholderName last4 routingNumber accountType } }"
    };
}

macro_rules! customer_fields {
    () => {
        "id legacyId firstName lastName email company phoneNumber createdAt"
    };
}

macro_rules! verification_fields {
    () => {
        "id legacyId status createdAt merchantAccountId gatewayRejectionReason \
processorResponse { legacyCode message cvvResponse avsPostalCodeResponse } paymentMethod { id }"
    };
}

mod customers;
mod errors;
mod identity;
mod operation;
mod payment_methods;
mod raw;
mod transactions;

pub use customers::{CustomerFields, CustomerIdArgs, SearchCustomersArgs, UpdateCustomerArgs};
pub use errors::ToolError;
pub use identity::LegacyIdArgs;
pub use operation::{check_document, Invocation, Operation, EMPTY_DOCUMENT, INVALID_DOCUMENT_FORMAT};
pub use payment_methods::{ClientTokenArgs, PaymentMethodIdArgs, VaultArgs, VerifyArgs};
pub use raw::RawArgs;
pub use transactions::{
    CaptureArgs, PartialCaptureArgs, PaymentArgs, RefundArgs, SearchTransactionsArgs,
    TransactionIdArgs,
};

/// Fixed page size of transaction and customer searches.
pub const SEARCH_PAGE_SIZE: u32 = 50;

/// Variables of `node(id:)` lookups.
#[derive(Debug, Serialize)]
pub(crate) struct NodeVariables {
    id: String,
}

/// Variables of mutations that take a single `input` object.
#[derive(Debug, Serialize)]
pub(crate) struct InputVariables<T> {
    input: T,
}

/// Every operation with a fixed document.
static OPERATIONS: &[&Operation] = &[
    &identity::PING,
    &identity::GRAPHQL_ID_FROM_LEGACY_ID,
    &transactions::FETCH_TRANSACTION,
    &transactions::SEARCH_TRANSACTIONS,
    &transactions::CHARGE_PAYMENT_METHOD,
    &transactions::AUTHORIZE_PAYMENT_METHOD,
    &transactions::CAPTURE_TRANSACTION,
    &transactions::PARTIAL_CAPTURE_TRANSACTION,
    &transactions::REVERSE_TRANSACTION,
    &transactions::REFUND_TRANSACTION,
    &payment_methods::FETCH_PAYMENT_METHOD,
    &payment_methods::VAULT_PAYMENT_METHOD,
    &payment_methods::VERIFY_PAYMENT_METHOD,
    &payment_methods::DELETE_PAYMENT_METHOD,
    &payment_methods::CREATE_CLIENT_TOKEN,
    &customers::FETCH_CUSTOMER,
    &customers::SEARCH_CUSTOMERS,
    &customers::CREATE_CUSTOMER,
    &customers::UPDATE_CUSTOMER,
    &customers::DELETE_CUSTOMER,
];

/// A tool exposed by the catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tool {
    Ping,
    GraphqlIdFromLegacyId,
    FetchTransaction,
    FetchCustomer,
    FetchPaymentMethod,
    SearchTransactions,
    SearchCustomers,
    ChargePaymentMethod,
    AuthorizePaymentMethod,
    CaptureTransaction,
    PartialCaptureTransaction,
    ReverseTransaction,
    RefundTransaction,
    VaultPaymentMethod,
    VerifyPaymentMethod,
    CreateCustomer,
    UpdateCustomer,
    DeleteCustomer,
    DeletePaymentMethod,
    CreateClientToken,
    ExecuteGraphql,
}

impl Tool {
    /// All tools, in listing order.
    pub const ALL: [Self; 21] = [
        Self::Ping,
        Self::GraphqlIdFromLegacyId,
        Self::FetchTransaction,
        Self::FetchCustomer,
        Self::FetchPaymentMethod,
        Self::SearchTransactions,
        Self::SearchCustomers,
        Self::ChargePaymentMethod,
        Self::AuthorizePaymentMethod,
        Self::CaptureTransaction,
        Self::PartialCaptureTransaction,
        Self::ReverseTransaction,
        Self::RefundTransaction,
        Self::VaultPaymentMethod,
        Self::VerifyPaymentMethod,
        Self::CreateCustomer,
        Self::UpdateCustomer,
        Self::DeleteCustomer,
        Self::DeletePaymentMethod,
        Self::CreateClientToken,
        Self::ExecuteGraphql,
    ];

    /// Returns the name callers use for this tool.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Ping => "ping",
            Self::GraphqlIdFromLegacyId => "get_graphql_id_from_legacy_id",
            Self::FetchTransaction => "fetch_transaction",
            Self::FetchCustomer => "fetch_customer",
            Self::FetchPaymentMethod => "fetch_payment_method",
            Self::SearchTransactions => "search_transactions",
            Self::SearchCustomers => "search_customers",
            Self::ChargePaymentMethod => "charge_payment_method",
            Self::AuthorizePaymentMethod => "authorize_payment_method",
            Self::CaptureTransaction => "capture_transaction",
            Self::PartialCaptureTransaction => "partial_capture_transaction",
            Self::ReverseTransaction => "reverse_transaction",
            Self::RefundTransaction => "refund_transaction",
            Self::VaultPaymentMethod => "vault_payment_method",
            Self::VerifyPaymentMethod => "verify_payment_method",
            Self::CreateCustomer => "create_customer",
            Self::UpdateCustomer => "update_customer",
            Self::DeleteCustomer => "delete_customer",
            Self::DeletePaymentMethod => "delete_payment_method",
            Self::CreateClientToken => "create_client_token",
            Self::ExecuteGraphql => "execute_graphql",
        }
    }

    /// Returns a one-line description for tool listings.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Ping => "Check connectivity and authentication with the Braintree API.",
            Self::GraphqlIdFromLegacyId => {
                "Convert a legacy ID (legacy_id, legacy_id_type) into a GraphQL ID."
            }
            Self::FetchTransaction => "Fetch a transaction by GraphQL ID (transaction_id).",
            Self::FetchCustomer => {
                "Fetch a customer and their vaulted payment methods by GraphQL ID (customer_id)."
            }
            Self::FetchPaymentMethod => {
                "Fetch a vaulted payment method by GraphQL ID (payment_method_id)."
            }
            Self::SearchTransactions => {
                "Search transactions created on a day (date) or range (date, end_date), 50 per page (after)."
            }
            Self::SearchCustomers => {
                "Search customers by first_name, last_name or email substring, 50 per page (after)."
            }
            Self::ChargePaymentMethod => {
                "Authorize and submit for settlement (payment_method_id, amount, order_id, merchant_account_id)."
            }
            Self::AuthorizePaymentMethod => {
                "Authorize without capturing (payment_method_id, amount, order_id, merchant_account_id)."
            }
            Self::CaptureTransaction => {
                "Capture an authorized transaction (transaction_id, optional amount)."
            }
            Self::PartialCaptureTransaction => {
                "Capture part of an authorized transaction (transaction_id, amount)."
            }
            Self::ReverseTransaction => {
                "Void an unsettled transaction or refund a settled one (transaction_id)."
            }
            Self::RefundTransaction => {
                "Refund a settled transaction (transaction_id, optional amount, order_id)."
            }
            Self::VaultPaymentMethod => {
                "Vault a single-use payment method (payment_method_id, customer_id, verify, merchant_account_id)."
            }
            Self::VerifyPaymentMethod => {
                "Verify a vaulted payment method (payment_method_id, merchant_account_id)."
            }
            Self::CreateCustomer => {
                "Create a customer (first_name, last_name, email, company, phone_number)."
            }
            Self::UpdateCustomer => "Update a customer (customer_id plus at least one field).",
            Self::DeleteCustomer => {
                "Delete a customer (customer_id); vaulted payment methods must be deleted first."
            }
            Self::DeletePaymentMethod => {
                "Delete a vaulted payment method (payment_method_id)."
            }
            Self::CreateClientToken => {
                "Create a client token for client-side SDKs (customer_id, merchant_account_id)."
            }
            Self::ExecuteGraphql => {
                "Execute an arbitrary GraphQL query or mutation (query, variables) and return the raw result."
            }
        }
    }

    /// Returns the listing entry of this tool.
    #[must_use]
    pub const fn descriptor(self) -> ToolDescriptor {
        ToolDescriptor {
            name: self.name(),
            description: self.description(),
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Tool {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tool| tool.name() == s)
            .ok_or_else(|| ToolError::UnknownTool {
                name: s.to_string(),
            })
    }
}

/// Name and description of a tool, for a hosting transport's listing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ToolDescriptor {
    /// The tool name.
    pub name: &'static str,
    /// A one-line description.
    pub description: &'static str,
}

/// A decoded call, ready to run.
enum Call {
    Operation(Invocation),
    Raw(RawArgs),
}

/// Dispatches tool calls to the Braintree API.
///
/// Calls are independent: the catalog holds no per-call state and can be
/// shared across tasks.
#[derive(Debug)]
pub struct ToolCatalog {
    client: GraphqlClient,
}

// Verify ToolCatalog is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ToolCatalog>();
};

impl ToolCatalog {
    /// Creates a catalog.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingCredentials`] when the configuration has
    /// no credentials, or [`ConfigError::InvalidOperationDocument`] when a
    /// built-in document fails validation.
    pub fn new(config: &BraintreeConfig) -> Result<Self, ConfigError> {
        config.require_credentials()?;
        for operation in OPERATIONS {
            operation.validate()?;
        }

        tracing::info!(
            "Tool catalog ready with {} tools against {}",
            Tool::ALL.len(),
            config.graphql_url()
        );
        Ok(Self {
            client: GraphqlClient::new(config),
        })
    }

    /// Lists every tool.
    pub fn tools(&self) -> impl Iterator<Item = ToolDescriptor> {
        Tool::ALL.into_iter().map(Tool::descriptor)
    }

    /// Returns the executor used by this catalog.
    #[must_use]
    pub const fn client(&self) -> &GraphqlClient {
        &self.client
    }

    /// Calls a tool by name and returns its JSON text.
    ///
    /// Never fails: unknown tools, bad arguments and upstream failures all
    /// come back as failure envelopes. `execute_graphql` returns the raw
    /// result JSON instead of an envelope.
    pub async fn call(&self, name: &str, arguments: Value) -> String {
        let tool = match name.parse::<Tool>() {
            Ok(tool) => tool,
            Err(error) => {
                tracing::warn!("{error}");
                return error.into_envelope().to_json();
            }
        };
        tracing::debug!("Calling tool {tool}");

        match prepare(tool, arguments) {
            Ok(Call::Operation(invocation)) => self.run(&invocation).await.to_json(),
            Ok(Call::Raw(args)) => raw::execute_graphql(&self.client, args).await,
            Err(error) => {
                tracing::warn!("{tool}: {error}");
                error.into_envelope().to_json()
            }
        }
    }

    /// Executes a prepared invocation and normalizes the result.
    pub async fn run(&self, invocation: &Invocation) -> ToolEnvelope {
        let operation = invocation.operation();
        let result = self
            .client
            .execute(&invocation.request(), operation.max_retries)
            .await;
        let envelope = normalize(&result, &operation.rule, operation.context);

        match invocation.echo() {
            Some(echo) if envelope.is_success() => {
                envelope.with_payload(operation.rule.payload_key, echo.clone())
            }
            _ => envelope,
        }
    }
}

fn decode<T: DeserializeOwned>(tool: Tool, arguments: Value) -> Result<T, ToolError> {
    let arguments = match arguments {
        Value::Null => Value::Object(Map::new()),
        other => other,
    };
    serde_json::from_value(arguments).map_err(|e| ToolError::InvalidArguments {
        tool: tool.name(),
        reason: e.to_string(),
    })
}

fn prepare(tool: Tool, arguments: Value) -> Result<Call, ToolError> {
    let invocation = match tool {
        Tool::Ping => identity::ping(),
        Tool::GraphqlIdFromLegacyId => {
            identity::graphql_id_from_legacy_id(&decode(tool, arguments)?)?
        }
        Tool::FetchTransaction => transactions::fetch_transaction(&decode(tool, arguments)?)?,
        Tool::FetchCustomer => customers::fetch_customer(&decode(tool, arguments)?)?,
        Tool::FetchPaymentMethod => {
            payment_methods::fetch_payment_method(&decode(tool, arguments)?)?
        }
        Tool::SearchTransactions => transactions::search_transactions(&decode(tool, arguments)?)?,
        Tool::SearchCustomers => customers::search_customers(&decode(tool, arguments)?)?,
        Tool::ChargePaymentMethod => {
            transactions::charge_payment_method(&decode(tool, arguments)?)?
        }
        Tool::AuthorizePaymentMethod => {
            transactions::authorize_payment_method(&decode(tool, arguments)?)?
        }
        Tool::CaptureTransaction => transactions::capture_transaction(&decode(tool, arguments)?)?,
        Tool::PartialCaptureTransaction => {
            transactions::partial_capture_transaction(&decode(tool, arguments)?)?
        }
        Tool::ReverseTransaction => transactions::reverse_transaction(&decode(tool, arguments)?)?,
        Tool::RefundTransaction => transactions::refund_transaction(&decode(tool, arguments)?)?,
        Tool::VaultPaymentMethod => {
            payment_methods::vault_payment_method(&decode(tool, arguments)?)?
        }
        Tool::VerifyPaymentMethod => {
            payment_methods::verify_payment_method(&decode(tool, arguments)?)?
        }
        Tool::CreateCustomer => customers::create_customer(&decode(tool, arguments)?),
        Tool::UpdateCustomer => customers::update_customer(&decode(tool, arguments)?)?,
        Tool::DeleteCustomer => customers::delete_customer(&decode(tool, arguments)?)?,
        Tool::DeletePaymentMethod => {
            payment_methods::delete_payment_method(&decode(tool, arguments)?)?
        }
        Tool::CreateClientToken => payment_methods::create_client_token(&decode(tool, arguments)?),
        Tool::ExecuteGraphql => return Ok(Call::Raw(decode(tool, arguments)?)),
    };
    Ok(Call::Operation(invocation))
}
