//! Built-in record kinds of the console.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use serde_json::Value;

use super::{
    derive::Derivation,
    error::SchemaError,
    rules::{RecordCheck, Rule},
    schema::{FieldSpec, FileMode, RecordSchema, SectionSpec},
};

pub const EMPLOYEE: &str = "employee";
pub const PRODUCT: &str = "product";
pub const CUSTOMER: &str = "customer";
pub const ORDER: &str = "order";
pub const REGISTER: &str = "register";

pub const KINDS: [&str; 5] = [EMPLOYEE, PRODUCT, CUSTOMER, ORDER, REGISTER];

const DESIGNATIONS: [&str; 12] = [
    "Software Engineer",
    "Senior Software Engineer",
    "Team Lead",
    "Project Manager",
    "HR Manager",
    "Marketing Manager",
    "Sales Executive",
    "Accountant",
    "System Administrator",
    "Business Analyst",
    "UI/UX Designer",
    "DevOps Engineer",
];

const DEPARTMENTS: [&str; 8] = [
    "Information Technology",
    "Human Resources",
    "Marketing",
    "Sales",
    "Finance",
    "Operations",
    "Customer Service",
    "Research & Development",
];

const SUPERVISORS: [&str; 4] = [
    "John Smith - Team Lead",
    "Sarah Johnson - Project Manager",
    "Mike Wilson - Senior Manager",
    "Lisa Brown - Department Head",
];

const ACCESS_ROLES: [&str; 7] = [
    "Admin",
    "Manager",
    "Employee",
    "HR",
    "Finance",
    "Sales",
    "Read Only",
];

const CATEGORIES: [&str; 7] = [
    "Electronics",
    "Furniture",
    "Office Supplies",
    "Clothing",
    "Books",
    "Food & Beverage",
    "Hardware",
];

const UNIT_TYPES: [&str; 7] = ["Piece", "Kg", "Liter", "Box", "Meter", "Pack", "Set"];
const TAX_CODES: [&str; 5] = ["GST18", "GST12", "VAT20", "VAT10", "None"];
const COLORS: [&str; 10] = [
    "Red", "Blue", "Green", "Black", "White", "Silver", "Gold", "Yellow", "Orange", "Purple",
];

const BRANDS: [&str; 26] = [
    "TechBrand",
    "ComfortSeating",
    "ClickTech",
    "BrightHome",
    "Samsung",
    "Apple",
    "Sony",
    "HP",
    "Dell",
    "Logitech",
    "Steelcase",
    "Herman Miller",
    "IKEA",
    "Nike",
    "Adidas",
    "Puma",
    "Zara",
    "H&M",
    "Penguin Books",
    "Random House",
    "Coca-Cola",
    "Pepsi",
    "Nestle",
    "Bosch",
    "Makita",
    "Stanley",
];

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// `PREFIX-######` built from the clock's last six millisecond digits.
/// A process-wide counter keeps codes distinct when minted within the same millisecond.
pub fn sequence_code(prefix: &str) -> String {
    let millis = Utc::now().timestamp_millis().unsigned_abs();
    let bump = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}-{:06}", (millis + bump) % 1_000_000)
}

fn generated_id(prefix: &'static str) -> impl Fn() -> Value + Send + Sync + 'static {
    move || Value::String(sequence_code(prefix))
}

/// Looks up a built-in schema by kind name.
pub fn schema_for(kind: &str) -> Option<Result<RecordSchema, SchemaError>> {
    match kind {
        EMPLOYEE => Some(employee_schema()),
        PRODUCT => Some(product_schema()),
        CUSTOMER => Some(customer_schema()),
        ORDER => Some(order_schema()),
        REGISTER => Some(register_schema()),
        _ => None,
    }
}

pub fn employee_schema() -> Result<RecordSchema, SchemaError> {
    let cnic = Rule::pattern("[0-9]{5}-[0-9]{7}-[0-9]{1}", "use the format 00000-0000000-0")
        .map_err(|err| SchemaError::InvalidPattern {
            field: "cnic".to_string(),
            message: err.to_string(),
        })?;

    RecordSchema::builder(EMPLOYEE, "Employee")
        .section(
            SectionSpec::new("personal", "Personal Info")
                .field(FieldSpec::text("id", "Employee ID").generated(generated_id("EMP")).hidden())
                .field(FieldSpec::file("avatar", "Employee Photo", FileMode::DataUrl))
                .field(
                    FieldSpec::text("name", "Full Name")
                        .required()
                        .placeholder("Enter full name"),
                )
                .field(FieldSpec::select("gender", "Gender", ["Male", "Female", "Other"]))
                .field(FieldSpec::text("fatherName", "Father's Name"))
                .field(
                    FieldSpec::text("cnic", "CNIC")
                        .placeholder("00000-0000000-0")
                        .rule(cnic),
                )
                .field(FieldSpec::text("religion", "Religion"))
                .field(FieldSpec::email("email", "Email").required())
                .field(FieldSpec::text("contact", "Contact Number").required())
                .field(FieldSpec::text("city", "City"))
                .field(FieldSpec::text("country", "Country"))
                .field(FieldSpec::date("hiringDate", "Hiring Date"))
                .field(FieldSpec::textarea("address", "Address")),
        )
        .section(
            SectionSpec::new("job", "Job Details")
                .field(FieldSpec::select("designation", "Designation", DESIGNATIONS).required())
                .field(FieldSpec::select("department", "Department", DEPARTMENTS).required())
                .field(FieldSpec::text("location", "Location"))
                .field(FieldSpec::select("supervisor", "Supervisor", SUPERVISORS))
                .field(
                    FieldSpec::select(
                        "workingStatus",
                        "Working Status",
                        ["Active", "Resigned", "On Leave", "Terminated"],
                    )
                    .default_value("Active"),
                )
                .field(FieldSpec::date("resignationDate", "Resignation Date")),
        )
        .section(
            SectionSpec::new("salary", "Salary Info")
                .field(FieldSpec::number("basicSalary", "Basic Salary").rule(Rule::Min(0.0)))
                .field(FieldSpec::number("benefits", "Benefits").rule(Rule::Min(0.0)))
                .field(
                    FieldSpec::number("grossSalary", "Gross Salary")
                        .derived(Derivation::sum(["basicSalary", "benefits"])),
                ),
        )
        .section(
            SectionSpec::new("other", "Other Info")
                .field(FieldSpec::file("attachments", "Attachments", FileMode::Attachments))
                .field(FieldSpec::select("access", "Access Level", ACCESS_ROLES))
                .field(FieldSpec::number("salesTarget", "Sales Target").rule(Rule::Min(0.0)))
                .field(FieldSpec::textarea("employeeHistory", "Employee History"))
                .field(FieldSpec::text("area", "Area"))
                .field(
                    FieldSpec::text("position", "Position")
                        .derived(Derivation::copy("designation"))
                        .hidden(),
                )
                .field(
                    FieldSpec::number("salary", "Salary")
                        .derived(Derivation::copy("basicSalary"))
                        .hidden(),
                )
                .field(
                    FieldSpec::text("status", "Status")
                        .derived(Derivation::copy("workingStatus"))
                        .hidden(),
                ),
        )
        .require("id")
        .build()
}

pub fn product_schema() -> Result<RecordSchema, SchemaError> {
    RecordSchema::builder(PRODUCT, "Product")
        .section(
            SectionSpec::new("general", "General Information")
                .field(FieldSpec::text("id", "Product ID").generated(generated_id("PROD")).hidden())
                .field(FieldSpec::file("imageUrl", "Product Image", FileMode::Upload))
                .field(
                    FieldSpec::text("itemCode", "Item Code")
                        .required()
                        .generated(generated_id("ITEM")),
                )
                .field(FieldSpec::text("name", "Product Name").required())
                .field(FieldSpec::textarea("description", "Description"))
                .field(FieldSpec::select("category", "Category", CATEGORIES).required())
                .field(FieldSpec::select("unitType", "Unit Type", UNIT_TYPES).required())
                .field(FieldSpec::text("sku", "SKU").required())
                .field(FieldSpec::number("stock", "Stock Quantity").rule(Rule::Min(0.0)))
                .field(
                    FieldSpec::text("status", "Status")
                        .derived(Derivation::stock_status("stock"))
                        .hidden(),
                ),
        )
        .section(
            SectionSpec::new("sales", "Sales Information")
                .field(
                    FieldSpec::number("mrp", "MRP (Maximum Retail Price)")
                        .required()
                        .rule(Rule::GreaterThan(0.0)),
                )
                .field(
                    FieldSpec::number("tradePrice", "Trade Price")
                        .required()
                        .rule(Rule::GreaterThan(0.0)),
                )
                .field(
                    FieldSpec::number("discount", "Discount (%)")
                        .rule(Rule::Min(0.0))
                        .rule(Rule::Max(100.0)),
                )
                .field(FieldSpec::select("taxCode", "Tax Code", TAX_CODES))
                .field(FieldSpec::text("brandName", "Brand Name").suggestions(BRANDS))
                .field(FieldSpec::select("color", "Color", COLORS))
                .field(
                    FieldSpec::number("finalPrice", "Final Price")
                        .derived(Derivation::discounted_price("tradePrice", "discount")),
                ),
        )
        .section(
            SectionSpec::new("purchase", "Purchase Information").field(
                FieldSpec::text("itemBarcode", "Item Barcode")
                    .derived(Derivation::copy("itemCode")),
            ),
        )
        .require("id")
        .build()
}

pub fn customer_schema() -> Result<RecordSchema, SchemaError> {
    RecordSchema::builder(CUSTOMER, "Customer")
        .section(
            SectionSpec::new("details", "Customer Details")
                .field(
                    FieldSpec::text("id", "Customer ID")
                        .generated(generated_id("CUST"))
                        .hidden(),
                )
                .field(FieldSpec::text("name", "Name").required())
                .field(FieldSpec::email("email", "Email").required())
                .field(FieldSpec::text("phone", "Phone").required())
                .field(FieldSpec::text("company", "Company").required())
                .field(
                    FieldSpec::select("status", "Status", ["Active", "Inactive"])
                        .default_value("Active"),
                ),
        )
        .require("id")
        .build()
}

pub fn order_schema() -> Result<RecordSchema, SchemaError> {
    RecordSchema::builder(ORDER, "Order")
        .section(
            SectionSpec::new("details", "Order Details")
                .field(FieldSpec::text("id", "Order ID").generated(generated_id("ORD")).hidden())
                .field(FieldSpec::text("customer", "Customer").required())
                .field(
                    FieldSpec::number("items", "Items")
                        .required()
                        .default_value(1)
                        .rule(Rule::Min(1.0)),
                )
                .field(FieldSpec::number("total", "Total").required().rule(Rule::Min(0.0)))
                .field(
                    FieldSpec::select(
                        "status",
                        "Status",
                        ["Pending", "Processing", "Completed", "Cancelled"],
                    )
                    .default_value("Pending"),
                ),
        )
        .require("id")
        .build()
}

pub fn register_schema() -> Result<RecordSchema, SchemaError> {
    RecordSchema::builder(REGISTER, "Create Account")
        .id_key("username")
        .section(
            SectionSpec::new("account", "Account")
                .field(FieldSpec::text("username", "Username").required())
                .field(FieldSpec::email("email", "Email").required())
                .field(FieldSpec::password("password", "Password").required())
                .field(FieldSpec::password("confirmPassword", "Confirm Password").required()),
        )
        .check(RecordCheck::matches(
            "confirmPassword",
            "password",
            "Passwords do not match.",
        ))
        .build()
}
