//! Customer tools: lookup, search, create, update and delete.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::clients::graphql::DEFAULT_MAX_RETRIES;
use crate::normalize::{ExtractionRule, Shape, ToolContext};
use crate::tools::operation::{optional, required, Invocation, Operation};
use crate::tools::{InputVariables, NodeVariables, ToolError, SEARCH_PAGE_SIZE};

const SEARCH_FILTERS: &str = "first_name, last_name, email";
const UPDATABLE_FIELDS: &str = "first_name, last_name, email, company, phone_number";

pub(crate) static FETCH_CUSTOMER: Operation = Operation {
    name: "fetch_customer",
    document: concat!(
        "query FetchCustomer($id: ID!) { node(id: $id) { __typename ... on Customer { ",
        customer_fields!(),
        " paymentMethods(first: 50) { pageInfo { hasNextPage endCursor } edges { node { ",
        payment_method_fields!(),
        " } } } } } }"
    ),
    rule: ExtractionRule::node(&["node"], "customer", "Customer").typed("Customer"),
    context: ToolContext::Lookup,
    max_retries: DEFAULT_MAX_RETRIES,
};

pub(crate) static SEARCH_CUSTOMERS: Operation = Operation {
    name: "search_customers",
    document: concat!(
        "query SearchCustomers($input: CustomerSearchInput!, $first: Int!, $after: String) { ",
        "search { customers(input: $input, first: $first, after: $after) { ",
        "pageInfo { hasNextPage endCursor } edges { node { ",
        customer_fields!(),
        " } } } } }"
    ),
    rule: ExtractionRule::node(&["search", "customers"], "customers", "Customer search")
        .shaped(Shape::Connection),
    context: ToolContext::Lookup,
    max_retries: DEFAULT_MAX_RETRIES,
};

pub(crate) static CREATE_CUSTOMER: Operation = Operation {
    name: "create_customer",
    document: concat!(
        "mutation CreateCustomer($input: CreateCustomerInput!) { ",
        "createCustomer(input: $input) { customer { ",
        customer_fields!(),
        " } } }"
    ),
    rule: ExtractionRule::node(&["createCustomer", "customer"], "customer", "Customer"),
    context: ToolContext::Customer,
    max_retries: DEFAULT_MAX_RETRIES,
};

pub(crate) static UPDATE_CUSTOMER: Operation = Operation {
    name: "update_customer",
    document: concat!(
        "mutation UpdateCustomer($input: UpdateCustomerInput!) { ",
        "updateCustomer(input: $input) { customer { ",
        customer_fields!(),
        " } } }"
    ),
    rule: ExtractionRule::node(&["updateCustomer", "customer"], "customer", "Customer"),
    context: ToolContext::Customer,
    max_retries: DEFAULT_MAX_RETRIES,
};

pub(crate) static DELETE_CUSTOMER: Operation = Operation {
    name: "delete_customer",
    document: "mutation DeleteCustomer($input: DeleteCustomerInput!) { \
deleteCustomer(input: $input) { clientMutationId } }",
    rule: ExtractionRule::node(&["deleteCustomer"], "customer_id", "Customer")
        .shaped(Shape::Acknowledged),
    context: ToolContext::CustomerDelete,
    max_retries: DEFAULT_MAX_RETRIES,
};

/// Arguments naming a single customer.
#[derive(Clone, Debug, Deserialize)]
pub struct CustomerIdArgs {
    /// GraphQL ID of the customer.
    pub customer_id: String,
}

/// Arguments of `search_customers`. At least one filter is required.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct SearchCustomersArgs {
    /// Substring of the first name.
    #[serde(default)]
    pub first_name: Option<String>,
    /// Substring of the last name.
    #[serde(default)]
    pub last_name: Option<String>,
    /// Substring of the email address.
    #[serde(default)]
    pub email: Option<String>,
    /// Cursor of the previous page.
    #[serde(default)]
    pub after: Option<String>,
}

/// Customer fields accepted by `create_customer` and `update_customer`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CustomerFields {
    /// First name.
    #[serde(default)]
    pub first_name: Option<String>,
    /// Last name.
    #[serde(default)]
    pub last_name: Option<String>,
    /// Email address.
    #[serde(default)]
    pub email: Option<String>,
    /// Company name.
    #[serde(default)]
    pub company: Option<String>,
    /// Phone number, in any format.
    #[serde(default)]
    pub phone_number: Option<String>,
}

/// Arguments of `update_customer`.
#[derive(Clone, Debug, Deserialize)]
pub struct UpdateCustomerArgs {
    /// GraphQL ID of the customer.
    pub customer_id: String,
    /// Fields to change; blank values are ignored.
    #[serde(flatten)]
    pub fields: CustomerFields,
}

#[derive(Debug, Serialize)]
struct TextFilter {
    contains: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CustomerSearchInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    first_name: Option<TextFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_name: Option<TextFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<TextFilter>,
}

impl CustomerSearchInput {
    const fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none() && self.email.is_none()
    }
}

#[derive(Debug, Serialize)]
struct SearchVariables {
    input: CustomerSearchInput,
    first: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    after: Option<String>,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct CustomerInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone_number: Option<String>,
}

impl CustomerInput {
    fn from_fields(fields: &CustomerFields) -> Self {
        Self {
            first_name: optional(fields.first_name.as_deref()),
            last_name: optional(fields.last_name.as_deref()),
            email: optional(fields.email.as_deref()),
            company: optional(fields.company.as_deref()),
            phone_number: optional(fields.phone_number.as_deref()),
        }
    }

    const fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.company.is_none()
            && self.phone_number.is_none()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CustomerMutationInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    customer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    customer: Option<CustomerInput>,
}

fn contains(value: Option<&str>) -> Option<TextFilter> {
    optional(value).map(|contains| TextFilter { contains })
}

pub(crate) fn fetch_customer(args: &CustomerIdArgs) -> Result<Invocation, ToolError> {
    let variables = NodeVariables {
        id: required("customer_id", &args.customer_id)?,
    };
    Ok(FETCH_CUSTOMER.invoke(&variables))
}

pub(crate) fn search_customers(args: &SearchCustomersArgs) -> Result<Invocation, ToolError> {
    let input = CustomerSearchInput {
        first_name: contains(args.first_name.as_deref()),
        last_name: contains(args.last_name.as_deref()),
        email: contains(args.email.as_deref()),
    };
    if input.is_empty() {
        return Err(ToolError::MissingFilter {
            fields: SEARCH_FILTERS,
        });
    }

    let variables = SearchVariables {
        input,
        first: SEARCH_PAGE_SIZE,
        after: optional(args.after.as_deref()),
    };
    Ok(SEARCH_CUSTOMERS.invoke(&variables))
}

pub(crate) fn create_customer(args: &CustomerFields) -> Invocation {
    let customer = CustomerInput::from_fields(args);
    let input = CustomerMutationInput {
        customer_id: None,
        customer: (!customer.is_empty()).then_some(customer),
    };
    CREATE_CUSTOMER.invoke(&InputVariables { input })
}

pub(crate) fn update_customer(args: &UpdateCustomerArgs) -> Result<Invocation, ToolError> {
    let customer_id = required("customer_id", &args.customer_id)?;
    let customer = CustomerInput::from_fields(&args.fields);
    if customer.is_empty() {
        return Err(ToolError::NothingToUpdate {
            fields: UPDATABLE_FIELDS,
        });
    }

    let input = CustomerMutationInput {
        customer_id: Some(customer_id),
        customer: Some(customer),
    };
    Ok(UPDATE_CUSTOMER.invoke(&InputVariables { input }))
}

pub(crate) fn delete_customer(args: &CustomerIdArgs) -> Result<Invocation, ToolError> {
    let customer_id = required("customer_id", &args.customer_id)?;
    let echo = Value::String(customer_id.clone());
    let input = CustomerMutationInput {
        customer_id: Some(customer_id),
        customer: None,
    };
    Ok(DELETE_CUSTOMER.invoke(&InputVariables { input }).echoing(echo))
}
