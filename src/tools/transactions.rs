//! Transaction tools: lookup, search, charge, authorize, capture, reverse, refund.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::clients::graphql::DEFAULT_MAX_RETRIES;
use crate::normalize::{ExtractionRule, Shape, ToolContext};
use crate::tools::operation::{optional, required, Invocation, Operation};
use crate::tools::{InputVariables, NodeVariables, ToolError, SEARCH_PAGE_SIZE};

pub(crate) static FETCH_TRANSACTION: Operation = Operation {
    name: "fetch_transaction",
    document: concat!(
        "query FetchTransaction($id: ID!) { node(id: $id) { __typename ... on Transaction { ",
        transaction_fields!(),
        " } } }"
    ),
    rule: ExtractionRule::node(&["node"], "transaction", "Transaction").typed("Transaction"),
    context: ToolContext::Lookup,
    max_retries: DEFAULT_MAX_RETRIES,
};

pub(crate) static SEARCH_TRANSACTIONS: Operation = Operation {
    name: "search_transactions",
    document: concat!(
        "query SearchTransactions($input: TransactionSearchInput!, $first: Int!, $after: String) { ",
        "search { transactions(input: $input, first: $first, after: $after) { ",
        "pageInfo { hasNextPage endCursor } edges { node { ",
        transaction_fields!(),
        " } } } } }"
    ),
    rule: ExtractionRule::node(&["search", "transactions"], "transactions", "Transaction search")
        .shaped(Shape::Connection),
    context: ToolContext::Lookup,
    max_retries: DEFAULT_MAX_RETRIES,
};

pub(crate) static CHARGE_PAYMENT_METHOD: Operation = Operation {
    name: "charge_payment_method",
    document: concat!(
        "mutation ChargePaymentMethod($input: ChargePaymentMethodInput!) { ",
        "chargePaymentMethod(input: $input) { transaction { ",
        transaction_fields!(),
        " } } }"
    ),
    rule: ExtractionRule::node(&["chargePaymentMethod", "transaction"], "transaction", "Transaction"),
    context: ToolContext::PaymentMethod,
    max_retries: DEFAULT_MAX_RETRIES,
};

pub(crate) static AUTHORIZE_PAYMENT_METHOD: Operation = Operation {
    name: "authorize_payment_method",
    document: concat!(
        "mutation AuthorizePaymentMethod($input: AuthorizePaymentMethodInput!) { ",
        "authorizePaymentMethod(input: $input) { transaction { ",
        transaction_fields!(),
        " } } }"
    ),
    rule: ExtractionRule::node(
        &["authorizePaymentMethod", "transaction"],
        "transaction",
        "Transaction",
    ),
    context: ToolContext::PaymentMethod,
    max_retries: DEFAULT_MAX_RETRIES,
};

pub(crate) static CAPTURE_TRANSACTION: Operation = Operation {
    name: "capture_transaction",
    document: concat!(
        "mutation CaptureTransaction($input: CaptureTransactionInput!) { ",
        "captureTransaction(input: $input) { transaction { ",
        transaction_fields!(),
        " } } }"
    ),
    rule: ExtractionRule::node(&["captureTransaction", "transaction"], "transaction", "Transaction"),
    context: ToolContext::Transaction,
    max_retries: DEFAULT_MAX_RETRIES,
};

pub(crate) static PARTIAL_CAPTURE_TRANSACTION: Operation = Operation {
    name: "partial_capture_transaction",
    document: concat!(
        "mutation PartialCaptureTransaction($input: PartialCaptureTransactionInput!) { ",
        "partialCaptureTransaction(input: $input) { capture { ",
        transaction_fields!(),
        " } } }"
    ),
    rule: ExtractionRule::node(
        &["partialCaptureTransaction", "capture"],
        "transaction",
        "Transaction",
    ),
    context: ToolContext::Transaction,
    max_retries: DEFAULT_MAX_RETRIES,
};

pub(crate) static REVERSE_TRANSACTION: Operation = Operation {
    name: "reverse_transaction",
    document: concat!(
        "mutation ReverseTransaction($input: ReverseTransactionInput!) { ",
        "reverseTransaction(input: $input) { reversal { __typename ",
        "... on Transaction { ",
        transaction_fields!(),
        " } ... on Refund { ",
        refund_fields!(),
        " } } } }"
    ),
    rule: ExtractionRule::node(&["reverseTransaction", "reversal"], "reversal", "Reversal")
        .shaped(Shape::Reversal),
    context: ToolContext::Transaction,
    max_retries: DEFAULT_MAX_RETRIES,
};

pub(crate) static REFUND_TRANSACTION: Operation = Operation {
    name: "refund_transaction",
    document: concat!(
        "mutation RefundTransaction($input: RefundTransactionInput!) { ",
        "refundTransaction(input: $input) { refund { ",
        refund_fields!(),
        " } } }"
    ),
    rule: ExtractionRule::node(&["refundTransaction", "refund"], "refund", "Refund"),
    context: ToolContext::Transaction,
    max_retries: DEFAULT_MAX_RETRIES,
};

/// Arguments naming a single transaction.
#[derive(Clone, Debug, Deserialize)]
pub struct TransactionIdArgs {
    /// GraphQL ID of the transaction.
    pub transaction_id: String,
}

/// Arguments of `search_transactions`.
///
/// Transactions created on `date` (UTC) are returned, or on every day from
/// `date` to `end_date` inclusive. One page of [`SEARCH_PAGE_SIZE`] results
/// is fetched per call; pass the previous `page_info.endCursor` as `after`
/// for the next page.
#[derive(Clone, Debug, Deserialize)]
pub struct SearchTransactionsArgs {
    /// First day, `YYYY-MM-DD`.
    pub date: NaiveDate,
    /// Last day, `YYYY-MM-DD`; defaults to `date`.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Cursor of the previous page.
    #[serde(default)]
    pub after: Option<String>,
}

/// Arguments of `charge_payment_method` and `authorize_payment_method`.
#[derive(Clone, Debug, Deserialize)]
pub struct PaymentArgs {
    /// Vaulted payment method ID or single-use nonce.
    pub payment_method_id: String,
    /// Decimal amount, e.g. `"10.00"`.
    pub amount: String,
    /// Merchant order reference.
    #[serde(default)]
    pub order_id: Option<String>,
    /// Merchant account to process with.
    #[serde(default)]
    pub merchant_account_id: Option<String>,
}

/// Arguments of `capture_transaction`.
#[derive(Clone, Debug, Deserialize)]
pub struct CaptureArgs {
    /// GraphQL ID of the authorized transaction.
    pub transaction_id: String,
    /// Amount to capture; defaults to the authorized amount.
    #[serde(default)]
    pub amount: Option<String>,
}

/// Arguments of `partial_capture_transaction`.
#[derive(Clone, Debug, Deserialize)]
pub struct PartialCaptureArgs {
    /// GraphQL ID of the authorized transaction.
    pub transaction_id: String,
    /// Amount of this partial capture.
    pub amount: String,
}

/// Arguments of `refund_transaction`.
#[derive(Clone, Debug, Deserialize)]
pub struct RefundArgs {
    /// GraphQL ID of the settled transaction.
    pub transaction_id: String,
    /// Amount to refund; defaults to the full amount.
    #[serde(default)]
    pub amount: Option<String>,
    /// Merchant order reference for the refund.
    #[serde(default)]
    pub order_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DateRange {
    greater_than_or_equal_to: String,
    less_than_or_equal_to: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TransactionSearchInput {
    created_at: DateRange,
}

#[derive(Debug, Serialize)]
struct SearchVariables {
    input: TransactionSearchInput,
    first: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    after: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TransactionInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    amount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    merchant_account_id: Option<String>,
}

impl TransactionInput {
    const fn is_empty(&self) -> bool {
        self.amount.is_none() && self.order_id.is_none() && self.merchant_account_id.is_none()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PaymentMethodInput {
    payment_method_id: String,
    transaction: TransactionInput,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TransactionMutationInput {
    transaction_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    transaction: Option<TransactionInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    refund: Option<TransactionInput>,
}

impl TransactionMutationInput {
    fn new(transaction_id: &str) -> Result<Self, ToolError> {
        Ok(Self {
            transaction_id: required("transaction_id", transaction_id)?,
            transaction: None,
            refund: None,
        })
    }
}

fn day_start(date: NaiveDate) -> String {
    format!("{}T00:00:00Z", date.format("%Y-%m-%d"))
}

fn day_end(date: NaiveDate) -> String {
    format!("{}T23:59:59Z", date.format("%Y-%m-%d"))
}

pub(crate) fn fetch_transaction(args: &TransactionIdArgs) -> Result<Invocation, ToolError> {
    let variables = NodeVariables {
        id: required("transaction_id", &args.transaction_id)?,
    };
    Ok(FETCH_TRANSACTION.invoke(&variables))
}

pub(crate) fn search_transactions(args: &SearchTransactionsArgs) -> Result<Invocation, ToolError> {
    let end = args.end_date.unwrap_or(args.date);
    if end < args.date {
        return Err(ToolError::InvalidDateRange {
            start: args.date.to_string(),
            end: end.to_string(),
        });
    }

    let variables = SearchVariables {
        input: TransactionSearchInput {
            created_at: DateRange {
                greater_than_or_equal_to: day_start(args.date),
                less_than_or_equal_to: day_end(end),
            },
        },
        first: SEARCH_PAGE_SIZE,
        after: optional(args.after.as_deref()),
    };
    Ok(SEARCH_TRANSACTIONS.invoke(&variables))
}

fn payment_variables(args: &PaymentArgs) -> Result<InputVariables<PaymentMethodInput>, ToolError> {
    Ok(InputVariables {
        input: PaymentMethodInput {
            payment_method_id: required("payment_method_id", &args.payment_method_id)?,
            transaction: TransactionInput {
                amount: Some(required("amount", &args.amount)?),
                order_id: optional(args.order_id.as_deref()),
                merchant_account_id: optional(args.merchant_account_id.as_deref()),
            },
        },
    })
}

pub(crate) fn charge_payment_method(args: &PaymentArgs) -> Result<Invocation, ToolError> {
    Ok(CHARGE_PAYMENT_METHOD.invoke(&payment_variables(args)?))
}

pub(crate) fn authorize_payment_method(args: &PaymentArgs) -> Result<Invocation, ToolError> {
    Ok(AUTHORIZE_PAYMENT_METHOD.invoke(&payment_variables(args)?))
}

pub(crate) fn capture_transaction(args: &CaptureArgs) -> Result<Invocation, ToolError> {
    let mut input = TransactionMutationInput::new(&args.transaction_id)?;
    let amount = optional(args.amount.as_deref());
    if amount.is_some() {
        input.transaction = Some(TransactionInput {
            amount,
            order_id: None,
            merchant_account_id: None,
        });
    }
    Ok(CAPTURE_TRANSACTION.invoke(&InputVariables { input }))
}

pub(crate) fn partial_capture_transaction(
    args: &PartialCaptureArgs,
) -> Result<Invocation, ToolError> {
    let mut input = TransactionMutationInput::new(&args.transaction_id)?;
    input.transaction = Some(TransactionInput {
        amount: Some(required("amount", &args.amount)?),
        order_id: None,
        merchant_account_id: None,
    });
    Ok(PARTIAL_CAPTURE_TRANSACTION.invoke(&InputVariables { input }))
}

pub(crate) fn reverse_transaction(args: &TransactionIdArgs) -> Result<Invocation, ToolError> {
    let input = TransactionMutationInput::new(&args.transaction_id)?;
    Ok(REVERSE_TRANSACTION.invoke(&InputVariables { input }))
}

pub(crate) fn refund_transaction(args: &RefundArgs) -> Result<Invocation, ToolError> {
    let mut input = TransactionMutationInput::new(&args.transaction_id)?;
    let refund = TransactionInput {
        amount: optional(args.amount.as_deref()),
        order_id: optional(args.order_id.as_deref()),
        merchant_account_id: None,
    };
    if !refund.is_empty() {
        input.refund = Some(refund);
    }
    Ok(REFUND_TRANSACTION.invoke(&InputVariables { input }))
}
