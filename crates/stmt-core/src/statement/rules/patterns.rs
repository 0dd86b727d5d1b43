//! Pattern catalog for credit-card statement extraction.
//!
//! Every list here is ordered: earlier entries win. Issuer-specific
//! entries carry the canonical issuer name they are restricted to.

use lazy_static::lazy_static;
use regex::Regex;

/// Issuer detection rule: first match over the flattened text wins.
#[derive(Debug)]
pub struct IssuerRule {
    pub pattern: Regex,
    pub name: &'static str,
}

/// Kind of value a statement column holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Date,
    Amount,
}

/// Labelled columns found in statement summary tables.
///
/// Some columns are never reported; they are recognised so that their
/// position in a header row is counted when values are matched up by
/// column index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    StatementDate,
    DueDate,
    TotalDue,
    MinimumDue,
    CreditLimit,
    AvailableCredit,
    CashLimit,
    OpeningBalance,
    PaymentsCredits,
    PurchasesDebits,
    FinanceCharges,
}

impl Column {
    pub fn kind(&self) -> ValueKind {
        match self {
            Column::StatementDate | Column::DueDate => ValueKind::Date,
            _ => ValueKind::Amount,
        }
    }
}

/// One label variant for a column.
#[derive(Debug)]
pub struct ColumnLabel {
    pub column: Column,
    /// Only active when this issuer was detected.
    pub issuer: Option<&'static str>,
    pub pattern: Regex,
}

/// Masked card-number format.
#[derive(Debug)]
pub struct CardMask {
    /// Only active when this issuer was detected.
    pub issuer: Option<&'static str>,
    /// Group 1 captures the last four digits.
    pub pattern: Regex,
}

/// Label that introduces a customer name on the same line.
#[derive(Debug)]
pub struct NameLabel {
    pub issuer: Option<&'static str>,
    /// Group 1 captures the rest of the line after the label.
    pub pattern: Regex,
}

/// Date token: "15 Jan 2024", "January 15, 2024", "15/01/2024", "15-01-24".
pub const DATE_PATTERN: &str = concat!(
    r"\b(?:\d{1,2}(?:st|nd|rd|th)?[\s-]+",
    r"(?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)",
    r"\.?[\s,-]+(?:\d{4}|\d{2})",
    r"|(?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)",
    r"\.?\s+\d{1,2}(?:st|nd|rd|th)?,?\s+\d{4}",
    r"|\d{1,2}[/-]\d{1,2}[/-](?:\d{4}|\d{2}))\b",
);

fn issuer(pattern: &str, name: &'static str) -> IssuerRule {
    IssuerRule {
        pattern: Regex::new(pattern).unwrap(),
        name,
    }
}

fn label(column: Column, pattern: &str) -> ColumnLabel {
    ColumnLabel {
        column,
        issuer: None,
        pattern: Regex::new(pattern).unwrap(),
    }
}

fn issuer_label(issuer: &'static str, column: Column, pattern: &str) -> ColumnLabel {
    ColumnLabel {
        column,
        issuer: Some(issuer),
        pattern: Regex::new(pattern).unwrap(),
    }
}

fn mask(issuer: Option<&'static str>, pattern: &str) -> CardMask {
    CardMask {
        issuer,
        pattern: Regex::new(pattern).unwrap(),
    }
}

lazy_static! {
    // Issuers: more specific names first ("IDFC FIRST Bank" before "IDFC").
    // HDFC also accepts the common OCR misreads HDEC / HDFG / H D F C.
    pub static ref ISSUER_RULES: Vec<IssuerRule> = vec![
        issuer(r"(?i)\bIDFC\s*FIRST\s*Bank\b", "IDFC FIRST Bank"),
        issuer(r"(?i)\bIDFC\b", "IDFC Bank"),
        issuer(r"(?i)\bRBL\s*Bank\b|\bRBLBANK\b", "RBL Bank"),
        issuer(r"(?i)\bH\s?D\s?[FE]\s?[CG]\b|\bHDFC\s*Bank\b", "HDFC Bank"),
        issuer(r"(?i)\bICICI\b", "ICICI Bank"),
        issuer(r"(?i)\bAxis\s*Bank\b|\bAXIS\b", "Axis Bank"),
        issuer(r"(?i)\bSBI\s*Card\b|\bState\s*Bank\b|\bSBI\b", "SBI Card"),
        issuer(r"(?i)\bBank\s+of\s+America\b|\bBOA\b", "Bank of America"),
        issuer(r"(?i)\bAmerican\s*Express\b|\bAMEX\b", "American Express"),
        issuer(r"(?i)\bCitibank\b|\bCITI\b", "Citibank"),
        issuer(r"(?i)\bStandard\s*Chartered\b", "Standard Chartered"),
        issuer(r"(?i)\bHSBC\b", "HSBC"),
        issuer(r"(?i)\bKotak\b", "Kotak Mahindra Bank"),
        issuer(r"(?i)\bIndusInd\b", "IndusInd Bank"),
        issuer(r"(?i)\bYES\s*BANK\b", "Yes Bank"),
        issuer(r"(?i)\bAU\s*Small\s*Finance\b", "AU Small Finance Bank"),
        issuer(r"(?i)\bBajaj\s*Finserv\b", "Bajaj Finserv"),
    ];

    // Column labels, in priority order per column. Overlapping matches
    // are resolved longest-first ("Minimum Amount Due" over "Amount Due").
    pub static ref COLUMN_LABELS: Vec<ColumnLabel> = vec![
        label(Column::StatementDate, r"(?i)\bstatement\s*(?:generation\s*)?date\b"),
        label(Column::StatementDate, r"(?i)\bdate\s*of\s*statement\b"),
        label(Column::StatementDate, r"(?i)\bbill(?:ing)?\s*date\b"),

        label(Column::DueDate, r"(?i)\bpayment\s*due\s*date\b"),
        label(Column::DueDate, r"(?i)\bdue\s*date\b"),
        label(Column::DueDate, r"(?i)\bpay\s*by\b"),

        label(Column::TotalDue, r"(?i)\btotal\s*amount\s*due\b"),
        label(Column::TotalDue, r"(?i)\btotal\s*payment\s*due\b"),
        label(Column::TotalDue, r"(?i)\btotal\s*dues?\b"),
        label(Column::TotalDue, r"(?i)\bnew\s*balance\s*total\b"),
        label(Column::TotalDue, r"(?i)\bamount\s*due\b"),
        issuer_label("American Express", Column::TotalDue, r"(?i)\bclosing\s*balance\b"),
        issuer_label("SBI Card", Column::TotalDue, r"(?i)\btotal\s*outstanding\b"),

        label(Column::MinimumDue, r"(?i)\bminimum\s*amount\s*due\b"),
        label(Column::MinimumDue, r"(?i)\bminimum\s*payment\s*due\b"),
        label(Column::MinimumDue, r"(?i)\bmin(?:imum)?\.?\s*(?:amt\.?|amount)?\s*due\b"),
        issuer_label("Citibank", Column::MinimumDue, r"(?i)\bminimum\s*payment\b"),

        label(Column::CreditLimit, r"(?i)\btotal\s*credit\s*(?:limit|line)\b"),
        label(Column::CreditLimit, r"(?i)\bcredit\s*limit\b"),
        label(Column::CreditLimit, r"(?i)\bcredit\s*line\b"),

        label(Column::AvailableCredit, r"(?i)\bavailable\s*credit\s*limit\b"),
        label(Column::AvailableCredit, r"(?i)\bavailable\s*credit\b"),
        label(Column::AvailableCredit, r"(?i)\bcredit\s*available\b"),
        label(Column::AvailableCredit, r"(?i)\bavailable\s*limit\b"),

        label(Column::CashLimit, r"(?i)\bavailable\s*cash\s*limit\b"),
        label(Column::CashLimit, r"(?i)\bcash\s*limit\b"),

        label(Column::OpeningBalance, r"(?i)\bopening\s*balance\b"),
        label(Column::OpeningBalance, r"(?i)\bprevious\s*(?:statement\s*)?balance\b"),

        label(Column::PaymentsCredits, r"(?i)\bpayments?\s*(?:/|&|and)?\s*credits?\b"),
        label(Column::PurchasesDebits, r"(?i)\bpurchases?\s*(?:/|&|and)\s*(?:other\s*)?(?:debits?|charges)\b"),
        label(Column::FinanceCharges, r"(?i)\bfinance\s*charges?\b"),
    ];

    pub static ref DATE_TOKEN: Regex = Regex::new(&format!("(?i){}", DATE_PATTERN)).unwrap();

    // Numeric date broken into parts for plausibility checks.
    pub static ref NUMERIC_DATE: Regex = Regex::new(
        r"^(\d{1,2})[/-](\d{1,2})[/-](\d{4}|\d{2})$"
    ).unwrap();

    pub static ref TEXT_DATE_DAY_FIRST: Regex = Regex::new(
        r"(?i)^(\d{1,2})(?:st|nd|rd|th)?[\s-]+([a-z]{3})[a-z]*\.?[\s,-]+(\d{4}|\d{2})$"
    ).unwrap();

    pub static ref TEXT_DATE_MONTH_FIRST: Regex = Regex::new(
        r"(?i)^([a-z]{3})[a-z]*\.?\s+(\d{1,2})(?:st|nd|rd|th)?,?\s+(\d{4})$"
    ).unwrap();

    pub static ref BILLING_CYCLE_LABELLED: Regex = Regex::new(&format!(
        r"(?i)\b(?:statement\s*period|billing\s*(?:cycle|period)|statement\s*cycle)\b\s*[:\-]?\s*(?:from\s+)?({0})\s*(?:to|-|–|—)\s*({0})",
        DATE_PATTERN
    )).unwrap();

    pub static ref BILLING_CYCLE_BARE: Regex = Regex::new(&format!(
        r"(?i)({0})\s*(?:to|-|–|—)\s*({0})",
        DATE_PATTERN
    )).unwrap();

    // "<date> Payment Due" with the label after the value.
    pub static ref DUE_DATE_TRAILING: Regex = Regex::new(&format!(
        r"(?i)({})\s*(?:payment\s*due|due\s*date)\b",
        DATE_PATTERN
    )).unwrap();

    // Amount token with optional currency prefix and Dr/Cr suffix.
    pub static ref AMOUNT_TOKEN: Regex = Regex::new(
        r"(?i)(?P<cur>\b(?:rs\.?|inr)|₹|¥|\$|€|£)?\s*(?P<num>\d[\d,]*(?:\.\d+)?)(?P<drcr>\s*(?:dr|cr)\b\.?)?"
    ).unwrap();

    pub static ref AMOUNT_GROUPING: Regex = Regex::new(
        r"^(?:\d{1,3}(?:,\d{2,3})+|\d+)(?:\.\d{1,2})?$"
    ).unwrap();

    // "Rs. 14,098.00 Total" with the label after the value.
    pub static ref TOTAL_DUE_TRAILING: Regex = Regex::new(
        r"(?i)(?:\brs\.?|\binr\b|₹)\s*(\d[\d,]*(?:\.\d{1,2})?)\s*(?:total|due|payable)\b"
    ).unwrap();

    // Words allowed between a label and its value on the same line.
    pub static ref GAP_FILLER: Regex = Regex::new(
        r"(?i)\b(?:rs|inr|in|is|on|by|of|as)\b|[₹¥$€£]"
    ).unwrap();

    pub static ref CURRENCY_RULES: Vec<(Regex, &'static str)> = vec![
        (Regex::new(r"(?i)₹|\bINR\b|\bRs\b").unwrap(), "₹"),
        (Regex::new(r"(?i)\$|\bUSD\b").unwrap(), "$"),
        (Regex::new(r"(?i)€|\bEUR\b").unwrap(), "€"),
        (Regex::new(r"(?i)£|\bGBP\b").unwrap(), "£"),
        (Regex::new(r"(?i)¥|\bJPY\b").unwrap(), "¥"),
    ];

    // Card masks. Issuer formats are tried before the generic ones.
    pub static ref CARD_MASKS: Vec<CardMask> = vec![
        mask(Some("HDFC Bank"), r"\b\d{4}[ \t-]?\d{2}[Xx*]{2}[ \t-]?[Xx*]{4}[ \t-]?(\d{4})\b"),
        mask(Some("RBL Bank"), r"\b\d{4}[ \t-]?\d{2}[Xx*]{2}[ \t-]?[Xx*]{4}[ \t-]?(\d{4})\b"),
        mask(Some("ICICI Bank"), r"\b\d{4}[Xx*]{8}(\d{4})\b"),
        mask(Some("Axis Bank"), r"\b\d{6}[Xx*]{6}(\d{4})\b"),
        mask(Some("Kotak Mahindra Bank"), r"\b\d{4}[ \t-]?[Xx*]{4}[ \t-]?[Xx*]{4}[ \t-]?(\d{4})\b"),
        mask(Some("SBI Card"), r"[Xx*]{4}[ \t-]?[Xx*]{4}[ \t-]?[Xx*]{4}[ \t-]?(\d{4})\b"),
        mask(Some("American Express"), r"[Xx*]{4}[ \t-]?[Xx*]{6}[ \t-]?[Xx*\d](\d{4})\b"),
        mask(Some("IDFC FIRST Bank"), r"[Xx*]{12}(\d{4})\b"),
        mask(None, r"[\dXx*]{4}[ \t-]?[Xx*]{4}[ \t-]?(\d{4})\b"),
        mask(None, r"[Xx*]{6,}[ \t-]?(\d{4})\b"),
    ];

    pub static ref CARD_LABEL: Regex = Regex::new(
        r"(?i)\bcard\s*(?:number|no\.?|num|#)\s*[:\-]?\s*"
    ).unwrap();

    pub static ref CARD_ENDING_IN: Regex = Regex::new(
        r"(?i)\b(?:ending(?:\s*(?:in|with))?|ends?\s*(?:in|with)|last\s*(?:4|four)\s*(?:digits)?)\s*[:\-]?\s*(\d{4})\b"
    ).unwrap();

    pub static ref NAME_LABELS: Vec<NameLabel> = vec![
        NameLabel {
            issuer: None,
            pattern: Regex::new(concat!(
                r"(?i)\b(?:customer\s*name|card\s*holder(?:'?s)?\s*name|primary\s*card\s*holder|",
                r"card\s*holder|holder'?s?\s*name|statement\s*for|name|dear)\b\s*[:\-]?\s*(.*)$"
            )).unwrap(),
        },
        NameLabel {
            issuer: Some("American Express"),
            pattern: Regex::new(r"(?i)\b(?:prepared\s*for|card\s*member)\b\s*[:\-]?\s*(.*)$").unwrap(),
        },
    ];

    // Honorific followed by an all-caps name; the end of the name is
    // found by the extractor, not the pattern.
    pub static ref TITLE_NAME: Regex = Regex::new(
        r"\b(?:MRS|MR|MS|DR|SHRI|SMT|Mrs|Mr|Ms|Dr)\.?\s+([A-Z][A-Z.']+(?:\s+[A-Z][A-Z.']+)*)"
    ).unwrap();

    // All-caps name directly followed by a city or state.
    pub static ref NAME_BEFORE_CITY: Regex = Regex::new(concat!(
        r"\b([A-Z]{2,}(?:\s+[A-Z]{2,}){1,3})\s+",
        r"(?:NEW\s+DELHI|GURGAON|GURUGRAM|DELHI|MUMBAI|CHENNAI|BANGALORE|BENGALURU|KOLKATA|",
        r"HYDERABAD|PUNE|NOIDA|MAHARASHTRA|KARNATAKA|TELANGANA|HARYANA)\b"
    )).unwrap();

    pub static ref NAME_LINE: Regex = Regex::new(
        r"^[A-Z][A-Za-z.']+(?:[ \t]+[A-Z][A-Za-z.']+){1,3}$"
    ).unwrap();

    pub static ref TITLE_CASE_LINE: Regex = Regex::new(
        r"^[A-Z][a-z]+(?:[ \t]+[A-Z][a-z]+){1,3}$"
    ).unwrap();
}

/// Words that never appear in a person's name on a statement.
pub const NAME_STOP_WORDS: &[&str] = &[
    "STATEMENT", "BANK", "CREDIT", "CARD", "CARDS", "DUPLICATE", "CUSTOMER", "RELATIONSHIP",
    "ACCOUNT", "NUMBER", "DATE", "PAYMENT", "DUE", "TOTAL", "AMOUNT", "MINIMUM", "LIMIT",
    "BALANCE", "SUMMARY", "PAGE", "ADDRESS", "EMAIL", "MOBILE", "PHONE", "PERIOD", "BILLING",
    "AVAILABLE", "CASH", "REWARD", "REWARDS", "POINTS", "TRANSACTION", "TRANSACTIONS",
    "DETAILS", "INR", "RS", "TAX", "GST", "INVOICE", "PLATINUM", "GOLD", "TITANIUM",
    "SIGNATURE", "VISA", "MASTERCARD", "RUPAY", "HDFC", "ICICI", "AXIS", "SBI", "IDFC",
    "FIRST", "RBL", "KOTAK", "MAHINDRA", "CITI", "CITIBANK", "HSBC", "AMEX", "AMERICAN",
    "EXPRESS", "INDUSIND", "BAJAJ", "FINSERV", "CHARTERED", "STANDARD", "AMERICA",
];

/// Cities and states that end an address block.
pub const CITY_NAMES: &[&str] = &[
    "GURGAON", "GURUGRAM", "DELHI", "MUMBAI", "CHENNAI", "BANGALORE", "BENGALURU", "KOLKATA",
    "HYDERABAD", "PUNE", "NOIDA", "MAHARASHTRA", "KARNATAKA", "TELANGANA", "HARYANA",
    "AHMEDABAD", "JAIPUR", "LUCKNOW", "CHANDIGARH", "KERALA", "GUJARAT", "INDIA",
];

/// Tokens that mark the start of a postal address.
pub const ADDRESS_KEYWORDS: &[&str] = &[
    "FLAT", "HOUSE", "H-NO", "H.NO", "HNO", "H.NO.", "ROAD", "RD", "STREET", "ST", "COLONY",
    "NAGAR", "SECTOR", "PLOT", "APARTMENT", "APARTMENTS", "APT", "FLOOR", "BLOCK", "LANE",
    "NEAR", "OPP", "VILLAGE", "DIST", "DISTRICT", "PIN", "PINCODE", "TOWER", "PHASE",
    "SOCIETY", "MARG", "CROSS", "MAIN", "LAYOUT", "ENCLAVE", "VIHAR", "PO", "NO",
];

/// Four-digit groups that OCR produces far more often than real card suffixes.
pub const CARD_FALSE_POSITIVES: &[&str] = &["0000", "0001", "1234", "4045", "5000"];

/// Labels marking a number as a reference number rather than a card number.
pub const REFERENCE_LABELS: &[&str] = &["relationship", "customer", "account"];
