//! Static element model.
//!
//! A compact description of the resources and datatypes the service handles:
//! element order, cardinality, primitive kind, required code bindings, and
//! which elements are rendered as XML attributes. The XML codec uses it to
//! emit elements in definition order and to restore arrays and typed
//! primitives when decoding; the structural validator checks documents
//! against it.
//!
//! Choice elements are declared once with a `[x]` suffix (for example
//! `value[x]`) and resolved against the concrete JSON name (`valueBoolean`)
//! by [`TypeDef::element`].

/// How an element's value is represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// Any string-valued primitive (string, code, uri, dateTime, ...).
    String,
    /// `boolean`.
    Boolean,
    /// `integer`, `positiveInt`, `unsignedInt`.
    Integer,
    /// `decimal`.
    Decimal,
    /// Narrative XHTML (`Narrative.div`).
    Xhtml,
    /// A datatype or backbone element, named for lookup in the model.
    Complex(&'static str),
    /// A nested resource (`Bundle.entry.resource`, `contained`).
    Resource,
    /// A `[x]` choice element; the concrete kind comes from the JSON name.
    Choice,
}

impl ElementKind {
    /// Returns true for kinds that carry a single primitive value.
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            ElementKind::String | ElementKind::Boolean | ElementKind::Integer | ElementKind::Decimal
        )
    }
}

/// Where a type sits in the FHIR type hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Resource without narrative (Bundle).
    Resource,
    /// Resource with narrative, contained resources, and extensions.
    DomainResource,
    /// General-purpose datatype.
    Datatype,
    /// Element defined inline inside a resource.
    Backbone,
}

/// Definition of a single element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementDef {
    /// JSON property / XML element name.
    pub name: &'static str,
    /// Value representation.
    pub kind: ElementKind,
    /// Minimum cardinality.
    pub min: u32,
    /// Whether the element repeats (`0..*` / `1..*`).
    pub repeating: bool,
    /// Rendered as an XML attribute rather than a child element.
    pub attribute: bool,
    /// Required code binding, if any.
    pub binding: Option<&'static [&'static str]>,
}

impl ElementDef {
    /// An optional, non-repeating element.
    pub const fn optional(name: &'static str, kind: ElementKind) -> Self {
        Self {
            name,
            kind,
            min: 0,
            repeating: false,
            attribute: false,
            binding: None,
        }
    }

    /// A required, non-repeating element.
    pub const fn required(name: &'static str, kind: ElementKind) -> Self {
        Self {
            min: 1,
            ..Self::optional(name, kind)
        }
    }

    /// Marks the element as repeating.
    pub const fn many(self) -> Self {
        Self {
            repeating: true,
            ..self
        }
    }

    /// Marks the element as an XML attribute.
    pub const fn attribute(self) -> Self {
        Self {
            attribute: true,
            ..self
        }
    }

    /// Binds the element to a required set of codes.
    pub const fn bound(self, codes: &'static [&'static str]) -> Self {
        Self {
            binding: Some(codes),
            ..self
        }
    }

    /// Returns the `[x]` prefix if this is a choice element.
    pub fn choice_prefix(&self) -> Option<&'static str> {
        self.name.strip_suffix("[x]")
    }

    /// Returns true if `name` is this element or one of its choice variants.
    pub fn matches(&self, name: &str) -> bool {
        match self.choice_prefix() {
            Some(prefix) => name
                .strip_prefix(prefix)
                .is_some_and(|suffix| choice_kind(suffix).is_some()),
            None => self.name == name,
        }
    }
}

/// Resolves the kind of a choice variant from its type suffix.
pub fn choice_kind(suffix: &str) -> Option<ElementKind> {
    let kind = match suffix {
        "Boolean" => ElementKind::Boolean,
        "Integer" | "PositiveInt" | "UnsignedInt" => ElementKind::Integer,
        "Decimal" => ElementKind::Decimal,
        "String" | "Code" | "Uri" | "Url" | "Canonical" | "Date" | "DateTime" | "Instant"
        | "Time" | "Id" | "Oid" | "Uuid" | "Markdown" | "Base64Binary" => ElementKind::String,
        "Identifier" => ElementKind::Complex("Identifier"),
        "CodeableConcept" => ElementKind::Complex("CodeableConcept"),
        "Coding" => ElementKind::Complex("Coding"),
        "Reference" => ElementKind::Complex("Reference"),
        "Period" => ElementKind::Complex("Period"),
        "Quantity" => ElementKind::Complex("Quantity"),
        "Money" => ElementKind::Complex("Money"),
        "Attachment" => ElementKind::Complex("Attachment"),
        "Address" => ElementKind::Complex("Address"),
        "HumanName" => ElementKind::Complex("HumanName"),
        "ContactPoint" => ElementKind::Complex("ContactPoint"),
        _ => return None,
    };
    Some(kind)
}

/// Definition of a resource, datatype, or backbone element.
#[derive(Debug)]
pub struct TypeDef {
    /// Type name; backbone elements use their path (`Claim.item`).
    pub name: &'static str,
    /// Position in the type hierarchy.
    pub category: Category,
    /// Elements declared by this type, in order.
    pub elements: &'static [ElementDef],
}

impl TypeDef {
    /// Returns true for resource definitions.
    pub fn is_resource(&self) -> bool {
        matches!(self.category, Category::Resource | Category::DomainResource)
    }

    fn inherited(&self) -> &'static [&'static [ElementDef]] {
        match self.category {
            Category::Resource => &[RESOURCE_BASE],
            Category::DomainResource => &[RESOURCE_BASE, DOMAIN_RESOURCE_BASE],
            Category::Datatype => &[ELEMENT_BASE],
            Category::Backbone => &[ELEMENT_BASE, BACKBONE_BASE],
        }
    }

    /// Iterates over inherited and declared elements in definition order.
    pub fn all_elements(&self) -> impl Iterator<Item = &'static ElementDef> + use<'_> {
        self.inherited()
            .iter()
            .flat_map(|slice| slice.iter())
            .chain(self.elements.iter())
    }

    /// Looks up an element by its JSON name, resolving choice variants.
    pub fn element(&self, name: &str) -> Option<ElementDef> {
        let def = self.all_elements().find(|def| def.matches(name))?;
        match def.choice_prefix() {
            Some(prefix) => {
                let kind = choice_kind(&name[prefix.len()..])?;
                Some(ElementDef { kind, ..*def })
            }
            None => Some(*def),
        }
    }
}

/// Looks up any type (resource, datatype, or backbone) by name.
pub fn lookup(name: &str) -> Option<&'static TypeDef> {
    let def = match name {
        "Claim" => &CLAIM,
        "ClaimResponse" => &CLAIM_RESPONSE,
        "Bundle" => &BUNDLE,
        "OperationOutcome" => &OPERATION_OUTCOME,
        "Claim.related" => &CLAIM_RELATED,
        "Claim.payee" => &CLAIM_PAYEE,
        "Claim.careTeam" => &CLAIM_CARE_TEAM,
        "Claim.supportingInfo" => &CLAIM_SUPPORTING_INFO,
        "Claim.diagnosis" => &CLAIM_DIAGNOSIS,
        "Claim.procedure" => &CLAIM_PROCEDURE,
        "Claim.insurance" => &CLAIM_INSURANCE,
        "Claim.accident" => &CLAIM_ACCIDENT,
        "Claim.item" => &CLAIM_ITEM,
        "Patient" => &PATIENT,
        "Coverage" => &COVERAGE,
        "Organization" => &ORGANIZATION,
        "Practitioner" => &PRACTITIONER,
        "PractitionerRole" => &PRACTITIONER_ROLE,
        "Claim.item.detail" => &CLAIM_ITEM_DETAIL,
        "Claim.item.detail.subDetail" => &CLAIM_ITEM_SUB_DETAIL,
        "ClaimResponse.item" => &CLAIM_RESPONSE_ITEM,
        "ClaimResponse.item.detail" => &CLAIM_RESPONSE_ITEM_DETAIL,
        "ClaimResponse.item.detail.subDetail" => &CLAIM_RESPONSE_ITEM_SUB_DETAIL,
        "ClaimResponse.addItem" => &CLAIM_RESPONSE_ADD_ITEM,
        "ClaimResponse.addItem.detail" => &CLAIM_RESPONSE_ADD_ITEM_DETAIL,
        "ClaimResponse.addItem.detail.subDetail" => &CLAIM_RESPONSE_ADD_ITEM_SUB_DETAIL,
        "ClaimResponse.payment" => &CLAIM_RESPONSE_PAYMENT,
        "ClaimResponse.item.adjudication" => &CLAIM_RESPONSE_ADJUDICATION,
        "ClaimResponse.total" => &CLAIM_RESPONSE_TOTAL,
        "ClaimResponse.processNote" => &CLAIM_RESPONSE_PROCESS_NOTE,
        "ClaimResponse.insurance" => &CLAIM_RESPONSE_INSURANCE,
        "ClaimResponse.error" => &CLAIM_RESPONSE_ERROR,
        "Patient.contact" => &PATIENT_CONTACT,
        "Patient.communication" => &PATIENT_COMMUNICATION,
        "Patient.link" => &PATIENT_LINK,
        "Coverage.class" => &COVERAGE_CLASS,
        "Coverage.costToBeneficiary" => &COVERAGE_COST,
        "Coverage.costToBeneficiary.exception" => &COVERAGE_COST_EXCEPTION,
        "Organization.contact" => &ORGANIZATION_CONTACT,
        "Practitioner.qualification" => &PRACTITIONER_QUALIFICATION,
        "PractitionerRole.availableTime" => &PRACTITIONER_ROLE_AVAILABLE_TIME,
        "PractitionerRole.notAvailable" => &PRACTITIONER_ROLE_NOT_AVAILABLE,
        "Bundle.link" => &BUNDLE_LINK,
        "Bundle.entry" => &BUNDLE_ENTRY,
        "Bundle.entry.search" => &BUNDLE_ENTRY_SEARCH,
        "Bundle.entry.request" => &BUNDLE_ENTRY_REQUEST,
        "Bundle.entry.response" => &BUNDLE_ENTRY_RESPONSE,
        "OperationOutcome.issue" => &OPERATION_OUTCOME_ISSUE,
        "Element" => &ELEMENT,
        "Extension" => &EXTENSION,
        "Meta" => &META,
        "Narrative" => &NARRATIVE,
        "Identifier" => &IDENTIFIER,
        "CodeableConcept" => &CODEABLE_CONCEPT,
        "Coding" => &CODING,
        "Reference" => &REFERENCE,
        "Period" => &PERIOD,
        "Quantity" => &QUANTITY,
        "Money" => &MONEY,
        "Attachment" => &ATTACHMENT,
        "Address" => &ADDRESS,
        "HumanName" => &HUMAN_NAME,
        "ContactPoint" => &CONTACT_POINT,
        _ => return None,
    };
    Some(def)
}

/// Looks up a resource definition by its `resourceType`.
pub fn resource(name: &str) -> Option<&'static TypeDef> {
    lookup(name).filter(|def| def.is_resource())
}

// Shorthand used by the tables below.
const STR: ElementKind = ElementKind::String;
const BOOL: ElementKind = ElementKind::Boolean;
const INT: ElementKind = ElementKind::Integer;
const DEC: ElementKind = ElementKind::Decimal;
const CHOICE: ElementKind = ElementKind::Choice;
const RES: ElementKind = ElementKind::Resource;
const CC: ElementKind = ElementKind::Complex("CodeableConcept");
const REF: ElementKind = ElementKind::Complex("Reference");
const IDENT: ElementKind = ElementKind::Complex("Identifier");
const PERIOD_T: ElementKind = ElementKind::Complex("Period");
const MONEY_T: ElementKind = ElementKind::Complex("Money");
const QTY: ElementKind = ElementKind::Complex("Quantity");
const EXT: ElementKind = ElementKind::Complex("Extension");
const NAME: ElementKind = ElementKind::Complex("HumanName");
const TELECOM: ElementKind = ElementKind::Complex("ContactPoint");
const ADDR: ElementKind = ElementKind::Complex("Address");
const ADJUDICATION: ElementKind = ElementKind::Complex("ClaimResponse.item.adjudication");

const fn opt(name: &'static str, kind: ElementKind) -> ElementDef {
    ElementDef::optional(name, kind)
}

const fn req(name: &'static str, kind: ElementKind) -> ElementDef {
    ElementDef::required(name, kind)
}

const fn part(path: &'static str) -> ElementKind {
    ElementKind::Complex(path)
}

/// Required code bindings.
pub mod codes {
    /// Claim and ClaimResponse status.
    pub const FINANCIAL_STATUS: &[&str] = &["active", "cancelled", "draft", "entered-in-error"];
    /// Claim and ClaimResponse use.
    pub const CLAIM_USE: &[&str] = &["claim", "preauthorization", "predetermination"];
    /// ClaimResponse outcome.
    pub const CLAIM_OUTCOME: &[&str] = &["queued", "complete", "error", "partial"];
    /// ClaimResponse.processNote.type.
    pub const NOTE_TYPE: &[&str] = &["display", "print", "printoper"];
    /// Bundle.type.
    pub const BUNDLE_TYPE: &[&str] = &[
        "document",
        "message",
        "transaction",
        "transaction-response",
        "batch",
        "batch-response",
        "history",
        "searchset",
        "collection",
    ];
    /// Bundle.entry.search.mode.
    pub const SEARCH_MODE: &[&str] = &["match", "include", "outcome"];
    /// Bundle.entry.request.method.
    pub const HTTP_VERB: &[&str] = &["GET", "HEAD", "POST", "PUT", "DELETE", "PATCH"];
    /// Narrative.status.
    pub const NARRATIVE_STATUS: &[&str] = &["generated", "extensions", "additional", "empty"];
    /// OperationOutcome.issue.severity.
    pub const ISSUE_SEVERITY: &[&str] = &["fatal", "error", "warning", "information"];
    /// Identifier.use.
    pub const IDENTIFIER_USE: &[&str] = &["usual", "official", "temp", "secondary", "old"];
    /// Quantity.comparator.
    pub const COMPARATOR: &[&str] = &["<", "<=", ">=", ">"];
    /// AdministrativeGender.
    pub const GENDER: &[&str] = &["male", "female", "other", "unknown"];
    /// Patient.link.type.
    pub const LINK_TYPE: &[&str] = &["replaced-by", "replaces", "refer", "seealso"];
    /// HumanName.use.
    pub const NAME_USE: &[&str] = &[
        "usual",
        "official",
        "temp",
        "nickname",
        "anonymous",
        "old",
        "maiden",
    ];
    /// ContactPoint.system.
    pub const CONTACT_POINT_SYSTEM: &[&str] = &["phone", "fax", "email", "pager", "url", "sms", "other"];
    /// ContactPoint.use.
    pub const CONTACT_POINT_USE: &[&str] = &["home", "work", "temp", "old", "mobile"];
    /// PractitionerRole.availableTime.daysOfWeek.
    pub const DAYS_OF_WEEK: &[&str] = &["mon", "tue", "wed", "thu", "fri", "sat", "sun"];
}

const RESOURCE_BASE: &[ElementDef] = &[
    opt("id", STR),
    opt("meta", ElementKind::Complex("Meta")),
    opt("implicitRules", STR),
    opt("language", STR),
];

const DOMAIN_RESOURCE_BASE: &[ElementDef] = &[
    opt("text", ElementKind::Complex("Narrative")),
    opt("contained", RES).many(),
    opt("extension", EXT).many(),
    opt("modifierExtension", EXT).many(),
];

const ELEMENT_BASE: &[ElementDef] = &[opt("id", STR).attribute(), opt("extension", EXT).many()];

const BACKBONE_BASE: &[ElementDef] = &[opt("modifierExtension", EXT).many()];

// Resources

/// Claim (R4).
pub static CLAIM: TypeDef = TypeDef {
    name: "Claim",
    category: Category::DomainResource,
    elements: &[
        opt("identifier", IDENT).many(),
        req("status", STR).bound(codes::FINANCIAL_STATUS),
        req("type", CC),
        opt("subType", CC),
        req("use", STR).bound(codes::CLAIM_USE),
        req("patient", REF),
        opt("billablePeriod", PERIOD_T),
        req("created", STR),
        opt("enterer", REF),
        opt("insurer", REF),
        req("provider", REF),
        req("priority", CC),
        opt("fundsReserve", CC),
        opt("related", part("Claim.related")).many(),
        opt("prescription", REF),
        opt("originalPrescription", REF),
        opt("payee", part("Claim.payee")),
        opt("referral", REF),
        opt("facility", REF),
        opt("careTeam", part("Claim.careTeam")).many(),
        opt("supportingInfo", part("Claim.supportingInfo")).many(),
        opt("diagnosis", part("Claim.diagnosis")).many(),
        opt("procedure", part("Claim.procedure")).many(),
        req("insurance", part("Claim.insurance")).many(),
        opt("accident", part("Claim.accident")),
        opt("item", part("Claim.item")).many(),
        opt("total", MONEY_T),
    ],
};

static CLAIM_RELATED: TypeDef = TypeDef {
    name: "Claim.related",
    category: Category::Backbone,
    elements: &[
        opt("claim", REF),
        opt("relationship", CC),
        opt("reference", IDENT),
    ],
};

static CLAIM_PAYEE: TypeDef = TypeDef {
    name: "Claim.payee",
    category: Category::Backbone,
    elements: &[req("type", CC), opt("party", REF)],
};

static CLAIM_CARE_TEAM: TypeDef = TypeDef {
    name: "Claim.careTeam",
    category: Category::Backbone,
    elements: &[
        req("sequence", INT),
        req("provider", REF),
        opt("responsible", BOOL),
        opt("role", CC),
        opt("qualification", CC),
    ],
};

static CLAIM_SUPPORTING_INFO: TypeDef = TypeDef {
    name: "Claim.supportingInfo",
    category: Category::Backbone,
    elements: &[
        req("sequence", INT),
        req("category", CC),
        opt("code", CC),
        opt("timing[x]", CHOICE),
        opt("value[x]", CHOICE),
        opt("reason", CC),
    ],
};

static CLAIM_DIAGNOSIS: TypeDef = TypeDef {
    name: "Claim.diagnosis",
    category: Category::Backbone,
    elements: &[
        req("sequence", INT),
        req("diagnosis[x]", CHOICE),
        opt("type", CC).many(),
        opt("onAdmission", CC),
        opt("packageCode", CC),
    ],
};

static CLAIM_PROCEDURE: TypeDef = TypeDef {
    name: "Claim.procedure",
    category: Category::Backbone,
    elements: &[
        req("sequence", INT),
        opt("type", CC).many(),
        opt("date", STR),
        req("procedure[x]", CHOICE),
        opt("udi", REF).many(),
    ],
};

static CLAIM_INSURANCE: TypeDef = TypeDef {
    name: "Claim.insurance",
    category: Category::Backbone,
    elements: &[
        req("sequence", INT),
        req("focal", BOOL),
        opt("identifier", IDENT),
        req("coverage", REF),
        opt("businessArrangement", STR),
        opt("preAuthRef", STR).many(),
        opt("claimResponse", REF),
    ],
};

static CLAIM_ACCIDENT: TypeDef = TypeDef {
    name: "Claim.accident",
    category: Category::Backbone,
    elements: &[req("date", STR), opt("type", CC), opt("location[x]", CHOICE)],
};

static CLAIM_ITEM: TypeDef = TypeDef {
    name: "Claim.item",
    category: Category::Backbone,
    elements: &[
        req("sequence", INT),
        opt("careTeamSequence", INT).many(),
        opt("diagnosisSequence", INT).many(),
        opt("procedureSequence", INT).many(),
        opt("informationSequence", INT).many(),
        opt("revenue", CC),
        opt("category", CC),
        req("productOrService", CC),
        opt("modifier", CC).many(),
        opt("programCode", CC).many(),
        opt("serviced[x]", CHOICE),
        opt("location[x]", CHOICE),
        opt("quantity", QTY),
        opt("unitPrice", MONEY_T),
        opt("factor", DEC),
        opt("net", MONEY_T),
        opt("udi", REF).many(),
        opt("bodySite", CC),
        opt("subSite", CC).many(),
        opt("encounter", REF).many(),
        opt("detail", part("Claim.item.detail")).many(),
    ],
};

static CLAIM_ITEM_DETAIL: TypeDef = TypeDef {
    name: "Claim.item.detail",
    category: Category::Backbone,
    elements: &[
        req("sequence", INT),
        opt("revenue", CC),
        opt("category", CC),
        req("productOrService", CC),
        opt("modifier", CC).many(),
        opt("programCode", CC).many(),
        opt("quantity", QTY),
        opt("unitPrice", MONEY_T),
        opt("factor", DEC),
        opt("net", MONEY_T),
        opt("udi", REF).many(),
        opt("subDetail", part("Claim.item.detail.subDetail")).many(),
    ],
};

static CLAIM_ITEM_SUB_DETAIL: TypeDef = TypeDef {
    name: "Claim.item.detail.subDetail",
    category: Category::Backbone,
    elements: &[
        req("sequence", INT),
        opt("revenue", CC),
        opt("category", CC),
        req("productOrService", CC),
        opt("modifier", CC).many(),
        opt("programCode", CC).many(),
        opt("quantity", QTY),
        opt("unitPrice", MONEY_T),
        opt("factor", DEC),
        opt("net", MONEY_T),
        opt("udi", REF).many(),
    ],
};

/// ClaimResponse (R4).
pub static CLAIM_RESPONSE: TypeDef = TypeDef {
    name: "ClaimResponse",
    category: Category::DomainResource,
    elements: &[
        opt("identifier", IDENT).many(),
        req("status", STR).bound(codes::FINANCIAL_STATUS),
        req("type", CC),
        opt("subType", CC),
        req("use", STR).bound(codes::CLAIM_USE),
        req("patient", REF),
        req("created", STR),
        req("insurer", REF),
        opt("requestor", REF),
        opt("request", REF),
        req("outcome", STR).bound(codes::CLAIM_OUTCOME),
        opt("disposition", STR),
        opt("preAuthRef", STR),
        opt("preAuthPeriod", PERIOD_T),
        opt("payeeType", CC),
        opt("item", part("ClaimResponse.item")).many(),
        opt("addItem", part("ClaimResponse.addItem")).many(),
        opt("adjudication", ADJUDICATION).many(),
        opt("total", part("ClaimResponse.total")).many(),
        opt("payment", part("ClaimResponse.payment")),
        opt("fundsReserve", CC),
        opt("formCode", CC),
        opt("form", ElementKind::Complex("Attachment")),
        opt("processNote", part("ClaimResponse.processNote")).many(),
        opt("communicationRequest", REF).many(),
        opt("insurance", part("ClaimResponse.insurance")).many(),
        opt("error", part("ClaimResponse.error")).many(),
    ],
};

static CLAIM_RESPONSE_ITEM: TypeDef = TypeDef {
    name: "ClaimResponse.item",
    category: Category::Backbone,
    elements: &[
        req("itemSequence", INT),
        opt("noteNumber", INT).many(),
        req("adjudication", ADJUDICATION).many(),
        opt("detail", part("ClaimResponse.item.detail")).many(),
    ],
};

static CLAIM_RESPONSE_ITEM_DETAIL: TypeDef = TypeDef {
    name: "ClaimResponse.item.detail",
    category: Category::Backbone,
    elements: &[
        req("detailSequence", INT),
        opt("noteNumber", INT).many(),
        req("adjudication", ADJUDICATION).many(),
        opt("subDetail", part("ClaimResponse.item.detail.subDetail")).many(),
    ],
};

static CLAIM_RESPONSE_ITEM_SUB_DETAIL: TypeDef = TypeDef {
    name: "ClaimResponse.item.detail.subDetail",
    category: Category::Backbone,
    elements: &[
        req("subDetailSequence", INT),
        opt("noteNumber", INT).many(),
        opt("adjudication", ADJUDICATION).many(),
    ],
};

static CLAIM_RESPONSE_ADD_ITEM: TypeDef = TypeDef {
    name: "ClaimResponse.addItem",
    category: Category::Backbone,
    elements: &[
        opt("itemSequence", INT).many(),
        opt("detailSequence", INT).many(),
        opt("subdetailSequence", INT).many(),
        opt("provider", REF).many(),
        req("productOrService", CC),
        opt("modifier", CC).many(),
        opt("programCode", CC).many(),
        opt("serviced[x]", CHOICE),
        opt("location[x]", CHOICE),
        opt("quantity", QTY),
        opt("unitPrice", MONEY_T),
        opt("factor", DEC),
        opt("net", MONEY_T),
        opt("bodySite", CC),
        opt("subSite", CC).many(),
        opt("noteNumber", INT).many(),
        req("adjudication", ADJUDICATION).many(),
        opt("detail", part("ClaimResponse.addItem.detail")).many(),
    ],
};

static CLAIM_RESPONSE_ADD_ITEM_DETAIL: TypeDef = TypeDef {
    name: "ClaimResponse.addItem.detail",
    category: Category::Backbone,
    elements: &[
        req("productOrService", CC),
        opt("modifier", CC).many(),
        opt("quantity", QTY),
        opt("unitPrice", MONEY_T),
        opt("factor", DEC),
        opt("net", MONEY_T),
        opt("noteNumber", INT).many(),
        req("adjudication", ADJUDICATION).many(),
        opt("subDetail", part("ClaimResponse.addItem.detail.subDetail")).many(),
    ],
};

static CLAIM_RESPONSE_ADD_ITEM_SUB_DETAIL: TypeDef = TypeDef {
    name: "ClaimResponse.addItem.detail.subDetail",
    category: Category::Backbone,
    elements: &[
        req("productOrService", CC),
        opt("modifier", CC).many(),
        opt("quantity", QTY),
        opt("unitPrice", MONEY_T),
        opt("factor", DEC),
        opt("net", MONEY_T),
        opt("noteNumber", INT).many(),
        req("adjudication", ADJUDICATION).many(),
    ],
};

static CLAIM_RESPONSE_PAYMENT: TypeDef = TypeDef {
    name: "ClaimResponse.payment",
    category: Category::Backbone,
    elements: &[
        req("type", CC),
        opt("adjustment", MONEY_T),
        opt("adjustmentReason", CC),
        opt("date", STR),
        req("amount", MONEY_T),
        opt("identifier", IDENT),
    ],
};

static CLAIM_RESPONSE_ADJUDICATION: TypeDef = TypeDef {
    name: "ClaimResponse.item.adjudication",
    category: Category::Backbone,
    elements: &[
        req("category", CC),
        opt("reason", CC),
        opt("amount", MONEY_T),
        opt("value", DEC),
    ],
};

static CLAIM_RESPONSE_TOTAL: TypeDef = TypeDef {
    name: "ClaimResponse.total",
    category: Category::Backbone,
    elements: &[req("category", CC), req("amount", MONEY_T)],
};

static CLAIM_RESPONSE_PROCESS_NOTE: TypeDef = TypeDef {
    name: "ClaimResponse.processNote",
    category: Category::Backbone,
    elements: &[
        opt("number", INT),
        opt("type", STR).bound(codes::NOTE_TYPE),
        req("text", STR),
        opt("language", CC),
    ],
};

static CLAIM_RESPONSE_INSURANCE: TypeDef = TypeDef {
    name: "ClaimResponse.insurance",
    category: Category::Backbone,
    elements: &[
        req("sequence", INT),
        req("focal", BOOL),
        req("coverage", REF),
        opt("businessArrangement", STR),
        opt("claimResponse", REF),
    ],
};

static CLAIM_RESPONSE_ERROR: TypeDef = TypeDef {
    name: "ClaimResponse.error",
    category: Category::Backbone,
    elements: &[
        opt("itemSequence", INT),
        opt("detailSequence", INT),
        opt("subDetailSequence", INT),
        req("code", CC),
    ],
};

/// Bundle (R4).
pub static BUNDLE: TypeDef = TypeDef {
    name: "Bundle",
    category: Category::Resource,
    elements: &[
        opt("identifier", IDENT),
        req("type", STR).bound(codes::BUNDLE_TYPE),
        opt("timestamp", STR),
        opt("total", INT),
        opt("link", part("Bundle.link")).many(),
        opt("entry", part("Bundle.entry")).many(),
    ],
};

static BUNDLE_LINK: TypeDef = TypeDef {
    name: "Bundle.link",
    category: Category::Backbone,
    elements: &[req("relation", STR), req("url", STR)],
};

static BUNDLE_ENTRY: TypeDef = TypeDef {
    name: "Bundle.entry",
    category: Category::Backbone,
    elements: &[
        opt("link", part("Bundle.link")).many(),
        opt("fullUrl", STR),
        opt("resource", RES),
        opt("search", part("Bundle.entry.search")),
        opt("request", part("Bundle.entry.request")),
        opt("response", part("Bundle.entry.response")),
    ],
};

static BUNDLE_ENTRY_SEARCH: TypeDef = TypeDef {
    name: "Bundle.entry.search",
    category: Category::Backbone,
    elements: &[
        opt("mode", STR).bound(codes::SEARCH_MODE),
        opt("score", DEC),
    ],
};

static BUNDLE_ENTRY_REQUEST: TypeDef = TypeDef {
    name: "Bundle.entry.request",
    category: Category::Backbone,
    elements: &[
        req("method", STR).bound(codes::HTTP_VERB),
        req("url", STR),
        opt("ifNoneMatch", STR),
        opt("ifModifiedSince", STR),
        opt("ifMatch", STR),
        opt("ifNoneExist", STR),
    ],
};

static BUNDLE_ENTRY_RESPONSE: TypeDef = TypeDef {
    name: "Bundle.entry.response",
    category: Category::Backbone,
    elements: &[
        req("status", STR),
        opt("location", STR),
        opt("etag", STR),
        opt("lastModified", STR),
        opt("outcome", RES),
    ],
};

// Resources referenced by a prior authorization submission

/// Patient (R4).
pub static PATIENT: TypeDef = TypeDef {
    name: "Patient",
    category: Category::DomainResource,
    elements: &[
        opt("identifier", IDENT).many(),
        opt("active", BOOL),
        opt("name", NAME).many(),
        opt("telecom", TELECOM).many(),
        opt("gender", STR).bound(codes::GENDER),
        opt("birthDate", STR),
        opt("deceased[x]", CHOICE),
        opt("address", ADDR).many(),
        opt("maritalStatus", CC),
        opt("multipleBirth[x]", CHOICE),
        opt("photo", ElementKind::Complex("Attachment")).many(),
        opt("contact", part("Patient.contact")).many(),
        opt("communication", part("Patient.communication")).many(),
        opt("generalPractitioner", REF).many(),
        opt("managingOrganization", REF),
        opt("link", part("Patient.link")).many(),
    ],
};

static PATIENT_CONTACT: TypeDef = TypeDef {
    name: "Patient.contact",
    category: Category::Backbone,
    elements: &[
        opt("relationship", CC).many(),
        opt("name", NAME),
        opt("telecom", TELECOM).many(),
        opt("address", ADDR),
        opt("gender", STR).bound(codes::GENDER),
        opt("organization", REF),
        opt("period", PERIOD_T),
    ],
};

static PATIENT_COMMUNICATION: TypeDef = TypeDef {
    name: "Patient.communication",
    category: Category::Backbone,
    elements: &[req("language", CC), opt("preferred", BOOL)],
};

static PATIENT_LINK: TypeDef = TypeDef {
    name: "Patient.link",
    category: Category::Backbone,
    elements: &[req("other", REF), req("type", STR).bound(codes::LINK_TYPE)],
};

/// Coverage (R4).
pub static COVERAGE: TypeDef = TypeDef {
    name: "Coverage",
    category: Category::DomainResource,
    elements: &[
        opt("identifier", IDENT).many(),
        req("status", STR).bound(codes::FINANCIAL_STATUS),
        opt("type", CC),
        opt("policyHolder", REF),
        opt("subscriber", REF),
        opt("subscriberId", STR),
        req("beneficiary", REF),
        opt("dependent", STR),
        opt("relationship", CC),
        opt("period", PERIOD_T),
        req("payor", REF).many(),
        opt("class", part("Coverage.class")).many(),
        opt("order", INT),
        opt("network", STR),
        opt("costToBeneficiary", part("Coverage.costToBeneficiary")).many(),
        opt("subrogation", BOOL),
        opt("contract", REF).many(),
    ],
};

static COVERAGE_CLASS: TypeDef = TypeDef {
    name: "Coverage.class",
    category: Category::Backbone,
    elements: &[req("type", CC), req("value", STR), opt("name", STR)],
};

static COVERAGE_COST: TypeDef = TypeDef {
    name: "Coverage.costToBeneficiary",
    category: Category::Backbone,
    elements: &[
        opt("type", CC),
        req("value[x]", CHOICE),
        opt("exception", part("Coverage.costToBeneficiary.exception")).many(),
    ],
};

static COVERAGE_COST_EXCEPTION: TypeDef = TypeDef {
    name: "Coverage.costToBeneficiary.exception",
    category: Category::Backbone,
    elements: &[req("type", CC), opt("period", PERIOD_T)],
};

/// Organization (R4).
pub static ORGANIZATION: TypeDef = TypeDef {
    name: "Organization",
    category: Category::DomainResource,
    elements: &[
        opt("identifier", IDENT).many(),
        opt("active", BOOL),
        opt("type", CC).many(),
        opt("name", STR),
        opt("alias", STR).many(),
        opt("telecom", TELECOM).many(),
        opt("address", ADDR).many(),
        opt("partOf", REF),
        opt("contact", part("Organization.contact")).many(),
        opt("endpoint", REF).many(),
    ],
};

static ORGANIZATION_CONTACT: TypeDef = TypeDef {
    name: "Organization.contact",
    category: Category::Backbone,
    elements: &[
        opt("purpose", CC),
        opt("name", NAME),
        opt("telecom", TELECOM).many(),
        opt("address", ADDR),
    ],
};

/// Practitioner (R4).
pub static PRACTITIONER: TypeDef = TypeDef {
    name: "Practitioner",
    category: Category::DomainResource,
    elements: &[
        opt("identifier", IDENT).many(),
        opt("active", BOOL),
        opt("name", NAME).many(),
        opt("telecom", TELECOM).many(),
        opt("address", ADDR).many(),
        opt("gender", STR).bound(codes::GENDER),
        opt("birthDate", STR),
        opt("photo", ElementKind::Complex("Attachment")).many(),
        opt("qualification", part("Practitioner.qualification")).many(),
        opt("communication", CC).many(),
    ],
};

static PRACTITIONER_QUALIFICATION: TypeDef = TypeDef {
    name: "Practitioner.qualification",
    category: Category::Backbone,
    elements: &[
        opt("identifier", IDENT).many(),
        req("code", CC),
        opt("period", PERIOD_T),
        opt("issuer", REF),
    ],
};

/// PractitionerRole (R4).
pub static PRACTITIONER_ROLE: TypeDef = TypeDef {
    name: "PractitionerRole",
    category: Category::DomainResource,
    elements: &[
        opt("identifier", IDENT).many(),
        opt("active", BOOL),
        opt("period", PERIOD_T),
        opt("practitioner", REF),
        opt("organization", REF),
        opt("code", CC).many(),
        opt("specialty", CC).many(),
        opt("location", REF).many(),
        opt("healthcareService", REF).many(),
        opt("telecom", TELECOM).many(),
        opt("availableTime", part("PractitionerRole.availableTime")).many(),
        opt("notAvailable", part("PractitionerRole.notAvailable")).many(),
        opt("availabilityExceptions", STR),
        opt("endpoint", REF).many(),
    ],
};

static PRACTITIONER_ROLE_AVAILABLE_TIME: TypeDef = TypeDef {
    name: "PractitionerRole.availableTime",
    category: Category::Backbone,
    elements: &[
        opt("daysOfWeek", STR).many().bound(codes::DAYS_OF_WEEK),
        opt("allDay", BOOL),
        opt("availableStartTime", STR),
        opt("availableEndTime", STR),
    ],
};

static PRACTITIONER_ROLE_NOT_AVAILABLE: TypeDef = TypeDef {
    name: "PractitionerRole.notAvailable",
    category: Category::Backbone,
    elements: &[req("description", STR), opt("during", PERIOD_T)],
};

/// OperationOutcome (R4).
pub static OPERATION_OUTCOME: TypeDef = TypeDef {
    name: "OperationOutcome",
    category: Category::DomainResource,
    elements: &[req("issue", part("OperationOutcome.issue")).many()],
};

static OPERATION_OUTCOME_ISSUE: TypeDef = TypeDef {
    name: "OperationOutcome.issue",
    category: Category::Backbone,
    elements: &[
        req("severity", STR).bound(codes::ISSUE_SEVERITY),
        req("code", STR),
        opt("details", CC),
        opt("diagnostics", STR),
        opt("location", STR).many(),
        opt("expression", STR).many(),
    ],
};

// Datatypes

/// The base element: an `id` attribute and extensions. Describes the `_name`
/// companion of a primitive.
pub static ELEMENT: TypeDef = TypeDef {
    name: "Element",
    category: Category::Datatype,
    elements: &[],
};

static EXTENSION: TypeDef = TypeDef {
    name: "Extension",
    category: Category::Datatype,
    elements: &[req("url", STR).attribute(), opt("value[x]", CHOICE)],
};

static META: TypeDef = TypeDef {
    name: "Meta",
    category: Category::Datatype,
    elements: &[
        opt("versionId", STR),
        opt("lastUpdated", STR),
        opt("source", STR),
        opt("profile", STR).many(),
        opt("security", ElementKind::Complex("Coding")).many(),
        opt("tag", ElementKind::Complex("Coding")).many(),
    ],
};

static NARRATIVE: TypeDef = TypeDef {
    name: "Narrative",
    category: Category::Datatype,
    elements: &[
        req("status", STR).bound(codes::NARRATIVE_STATUS),
        req("div", ElementKind::Xhtml),
    ],
};

static IDENTIFIER: TypeDef = TypeDef {
    name: "Identifier",
    category: Category::Datatype,
    elements: &[
        opt("use", STR).bound(codes::IDENTIFIER_USE),
        opt("type", CC),
        opt("system", STR),
        opt("value", STR),
        opt("period", PERIOD_T),
        opt("assigner", REF),
    ],
};

static CODEABLE_CONCEPT: TypeDef = TypeDef {
    name: "CodeableConcept",
    category: Category::Datatype,
    elements: &[
        opt("coding", ElementKind::Complex("Coding")).many(),
        opt("text", STR),
    ],
};

static CODING: TypeDef = TypeDef {
    name: "Coding",
    category: Category::Datatype,
    elements: &[
        opt("system", STR),
        opt("version", STR),
        opt("code", STR),
        opt("display", STR),
        opt("userSelected", BOOL),
    ],
};

static REFERENCE: TypeDef = TypeDef {
    name: "Reference",
    category: Category::Datatype,
    elements: &[
        opt("reference", STR),
        opt("type", STR),
        opt("identifier", IDENT),
        opt("display", STR),
    ],
};

static PERIOD: TypeDef = TypeDef {
    name: "Period",
    category: Category::Datatype,
    elements: &[opt("start", STR), opt("end", STR)],
};

static QUANTITY: TypeDef = TypeDef {
    name: "Quantity",
    category: Category::Datatype,
    elements: &[
        opt("value", DEC),
        opt("comparator", STR).bound(codes::COMPARATOR),
        opt("unit", STR),
        opt("system", STR),
        opt("code", STR),
    ],
};

static MONEY: TypeDef = TypeDef {
    name: "Money",
    category: Category::Datatype,
    elements: &[opt("value", DEC), opt("currency", STR)],
};

static ATTACHMENT: TypeDef = TypeDef {
    name: "Attachment",
    category: Category::Datatype,
    elements: &[
        opt("contentType", STR),
        opt("language", STR),
        opt("data", STR),
        opt("url", STR),
        opt("size", INT),
        opt("hash", STR),
        opt("title", STR),
        opt("creation", STR),
    ],
};

static ADDRESS: TypeDef = TypeDef {
    name: "Address",
    category: Category::Datatype,
    elements: &[
        opt("use", STR),
        opt("type", STR),
        opt("text", STR),
        opt("line", STR).many(),
        opt("city", STR),
        opt("district", STR),
        opt("state", STR),
        opt("postalCode", STR),
        opt("country", STR),
        opt("period", PERIOD_T),
    ],
};

static HUMAN_NAME: TypeDef = TypeDef {
    name: "HumanName",
    category: Category::Datatype,
    elements: &[
        opt("use", STR).bound(codes::NAME_USE),
        opt("text", STR),
        opt("family", STR),
        opt("given", STR).many(),
        opt("prefix", STR).many(),
        opt("suffix", STR).many(),
        opt("period", PERIOD_T),
    ],
};

static CONTACT_POINT: TypeDef = TypeDef {
    name: "ContactPoint",
    category: Category::Datatype,
    elements: &[
        opt("system", STR).bound(codes::CONTACT_POINT_SYSTEM),
        opt("value", STR),
        opt("use", STR).bound(codes::CONTACT_POINT_USE),
        opt("rank", INT),
        opt("period", PERIOD_T),
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inherited_elements_come_first() {
        let names: Vec<_> = CLAIM.all_elements().map(|d| d.name).take(9).collect();
        assert_eq!(
            names,
            vec![
                "id",
                "meta",
                "implicitRules",
                "language",
                "text",
                "contained",
                "extension",
                "modifierExtension",
                "identifier"
            ]
        );
    }

    #[test]
    fn test_datatype_id_is_attribute() {
        let id = lookup("Coding").and_then(|t| t.element("id")).unwrap();
        assert!(id.attribute);

        let resource_id = CLAIM.element("id").unwrap();
        assert!(!resource_id.attribute);
    }

    #[test]
    fn test_choice_resolution() {
        let ext = lookup("Extension").unwrap();
        assert_eq!(ext.element("valueBoolean").unwrap().kind, ElementKind::Boolean);
        assert_eq!(
            ext.element("valueReference").unwrap().kind,
            ElementKind::Complex("Reference")
        );
        assert!(ext.element("valueNonsense").is_none());
        assert!(ext.element("value").is_none());
    }

    #[test]
    fn test_every_complex_kind_resolves() {
        let mut pending = vec![
            "Claim",
            "ClaimResponse",
            "Bundle",
            "OperationOutcome",
            "Patient",
            "Coverage",
            "Organization",
            "Practitioner",
            "PractitionerRole",
        ];
        let mut seen = Vec::new();
        while let Some(name) = pending.pop() {
            if seen.contains(&name) {
                continue;
            }
            seen.push(name);
            let def = lookup(name).unwrap_or_else(|| panic!("{name} is not defined"));
            for element in def.all_elements() {
                if let ElementKind::Complex(target) = element.kind {
                    assert!(lookup(target).is_some(), "{name}.{} -> {target}", element.name);
                    pending.push(target);
                }
            }
        }
        assert!(seen.contains(&"ClaimResponse.addItem.detail.subDetail"));
        assert!(seen.contains(&"HumanName"));
    }

    #[test]
    fn test_nested_detail_levels_repeat() {
        let detail = lookup("Claim.item").and_then(|t| t.element("detail")).unwrap();
        assert!(detail.repeating);
        assert_eq!(detail.kind, ElementKind::Complex("Claim.item.detail"));

        let sub = lookup("ClaimResponse.item.detail")
            .and_then(|t| t.element("subDetail"))
            .unwrap();
        assert!(sub.repeating);

        let adjudication = CLAIM_RESPONSE.element("adjudication").unwrap();
        assert_eq!(
            adjudication.kind,
            ElementKind::Complex("ClaimResponse.item.adjudication")
        );
    }

    #[test]
    fn test_entry_resources_are_typed() {
        let patient = resource("Patient").unwrap();
        assert_eq!(patient.element("active").unwrap().kind, ElementKind::Boolean);
        assert!(patient.element("name").unwrap().repeating);
        assert_eq!(
            patient.element("deceasedBoolean").unwrap().kind,
            ElementKind::Boolean
        );
        assert_eq!(
            patient.element("multipleBirthInteger").unwrap().kind,
            ElementKind::Integer
        );
        assert_eq!(resource("Coverage").unwrap().element("order").unwrap().kind, ElementKind::Integer);
        assert!(resource("Organization").is_some());
        assert!(resource("Observation").is_none());
    }

    #[test]
    fn test_resource_lookup_excludes_datatypes() {
        assert!(resource("Claim").is_some());
        assert!(resource("OperationOutcome").is_some());
        assert!(resource("Coding").is_none());
        assert!(resource("Claim.item").is_none());
    }
}
