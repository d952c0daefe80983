// crates/verdict-resolve/src/http.rs
// ============================================================================
// Module: HTTP Fact Resolver
// Description: Fact resolver backed by the HTTP result and waiver stores.
// Purpose: Fetch results and waivers over bounded, paginated GET requests.
// Dependencies: verdict-core, reqwest, url
// ============================================================================

//! ## Overview
//! The HTTP resolver queries the external result and waiver stores over
//! their JSON APIs and projects the responses into core fact records.
//! Requests carry a bounded timeout, redirects are disabled, and pagination
//! follows the store's `next` link up to a fixed page budget so a
//! misbehaving store cannot hold a decision open indefinitely. Transport
//! failures and undecodable responses map to distinct resolver errors;
//! neither is ever silently treated as an empty fact set.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::redirect::Policy;
use serde::Deserialize;
use tracing::debug;
use url::Url;
use verdict_core::FactResolver;
use verdict_core::Outcome;
use verdict_core::ProductVersion;
use verdict_core::ResolveError;
use verdict_core::ResultId;
use verdict_core::Subject;
use verdict_core::TestCaseName;
use verdict_core::TestResult;
use verdict_core::Waiver;
use verdict_core::WaiverId;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Configuration for the HTTP fact resolver.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HttpResolverConfig {
    /// Base URL of the result store query endpoint.
    pub results_url: String,
    /// Base URL of the waiver store query endpoint.
    pub waivers_url: String,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
    /// User agent string for outbound requests.
    pub user_agent: String,
    /// Maximum pagination pages followed per fetch.
    pub max_pages: usize,
}

impl Default for HttpResolverConfig {
    fn default() -> Self {
        Self {
            results_url: "http://localhost:5001/api/v2.0/results".to_string(),
            waivers_url: "http://localhost:5004/api/v1.0/waivers".to_string(),
            timeout_ms: 5_000,
            user_agent: "verdict/0.1".to_string(),
            max_pages: 20,
        }
    }
}

// ============================================================================
// SECTION: Wire Types
// ============================================================================

/// One page of a paginated store response.
#[derive(Debug, Deserialize)]
struct Page<T> {
    /// Records on this page.
    data: Vec<T>,
    /// Absolute URL of the next page, when more records exist.
    next: Option<String>,
}

/// Result record as returned by the result store.
#[derive(Debug, Deserialize)]
struct RawResult {
    /// Store-assigned result identifier.
    id: u64,
    /// Reported outcome string.
    outcome: String,
    /// Test case descriptor.
    testcase: RawTestCase,
    /// Store metadata; values are multi-valued per the store's data model.
    #[serde(default)]
    data: BTreeMap<String, Vec<String>>,
}

/// Test case descriptor inside a result record.
#[derive(Debug, Deserialize)]
struct RawTestCase {
    /// Test case name.
    name: String,
}

/// Waiver record as returned by the waiver store.
#[derive(Debug, Deserialize)]
struct RawWaiver {
    /// Store-assigned waiver identifier.
    id: u64,
    /// Subject the waiver applies to.
    subject: BTreeMap<String, String>,
    /// Test case the waiver applies to.
    testcase: String,
    /// Product version the waiver applies to.
    product_version: String,
    /// Whether the requirement is waived.
    waived: bool,
}

// ============================================================================
// SECTION: Resolver Implementation
// ============================================================================

/// Fact resolver backed by the HTTP result and waiver stores.
#[derive(Debug)]
pub struct HttpFactResolver {
    /// Resolver configuration.
    config: HttpResolverConfig,
    /// Parsed result store endpoint.
    results_url: Url,
    /// Parsed waiver store endpoint.
    waivers_url: Url,
    /// HTTP client used for outbound requests.
    client: Client,
}

impl HttpFactResolver {
    /// Creates a new HTTP resolver from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::Configuration`] when an endpoint URL is
    /// invalid or the HTTP client cannot be built.
    pub fn new(config: HttpResolverConfig) -> Result<Self, ResolveError> {
        let results_url = parse_endpoint(&config.results_url)?;
        let waivers_url = parse_endpoint(&config.waivers_url)?;
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(config.user_agent.clone())
            .redirect(Policy::none())
            .build()
            .map_err(|err| ResolveError::Configuration(format!("http client build failed: {err}")))?;
        Ok(Self {
            config,
            results_url,
            waivers_url,
            client,
        })
    }

    /// Fetches every page of a paginated endpoint.
    fn fetch_pages<T>(&self, first: Url) -> Result<Vec<T>, ResolveError>
    where
        T: serde::de::DeserializeOwned,
    {
        let mut records = Vec::new();
        let mut next = Some(first);
        let mut pages = 0_usize;
        while let Some(url) = next.take() {
            if pages >= self.config.max_pages {
                return Err(ResolveError::InvalidResponse(format!(
                    "pagination exceeded {} pages",
                    self.config.max_pages
                )));
            }
            pages += 1;
            let page: Page<T> = self.fetch_page(url)?;
            records.extend(page.data);
            next = page
                .next
                .map(|link| {
                    Url::parse(&link).map_err(|err| {
                        ResolveError::InvalidResponse(format!("invalid next link: {err}"))
                    })
                })
                .transpose()?;
        }
        Ok(records)
    }

    /// Fetches and decodes one page.
    fn fetch_page<T>(&self, url: Url) -> Result<Page<T>, ResolveError>
    where
        T: serde::de::DeserializeOwned,
    {
        debug!(url = %url, "querying fact store");
        let response = self
            .client
            .get(url.clone())
            .send()
            .map_err(|err| ResolveError::UpstreamUnavailable(format!("request failed: {err}")))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ResolveError::UpstreamUnavailable(format!(
                "store returned {status} for {url}"
            )));
        }
        response
            .json()
            .map_err(|err| ResolveError::InvalidResponse(format!("undecodable page: {err}")))
    }
}

impl FactResolver for HttpFactResolver {
    fn fetch_results(
        &self,
        subject: &Subject,
        exclude: &BTreeSet<ResultId>,
    ) -> Result<Vec<TestResult>, ResolveError> {
        let mut url = self.results_url.clone();
        {
            let mut params = url.query_pairs_mut();
            for (name, value) in subject.fields() {
                params.append_pair(name, value);
            }
        }

        let raw: Vec<RawResult> = self.fetch_pages(url)?;
        Ok(raw
            .into_iter()
            .map(|record| project_result(record, subject))
            .filter(|result| !exclude.contains(&result.id))
            .collect())
    }

    fn fetch_waivers(
        &self,
        subject: &Subject,
        product_version: &ProductVersion,
        exclude: &BTreeSet<WaiverId>,
    ) -> Result<Vec<Waiver>, ResolveError> {
        let mut url = self.waivers_url.clone();
        {
            let mut params = url.query_pairs_mut();
            params.append_pair("subject", &subject.canonical());
            params.append_pair("product_version", product_version.as_str());
            params.append_pair("include_obsolete", "false");
        }

        let raw: Vec<RawWaiver> = self.fetch_pages(url)?;
        let mut waivers = Vec::with_capacity(raw.len());
        for record in raw {
            let waiver = project_waiver(record)?;
            if !exclude.contains(&waiver.id) {
                waivers.push(waiver);
            }
        }
        Ok(waivers)
    }
}

// ============================================================================
// SECTION: Projection Helpers
// ============================================================================

/// Parses and validates one endpoint URL.
fn parse_endpoint(raw: &str) -> Result<Url, ResolveError> {
    let url = Url::parse(raw)
        .map_err(|err| ResolveError::Configuration(format!("invalid endpoint {raw}: {err}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ResolveError::Configuration(format!("unsupported endpoint scheme {other}"))),
    }
}

/// Projects a raw result record onto the core result type.
///
/// The store echoes the queried subject, so the projection attaches the
/// query subject rather than re-deriving it from record metadata.
fn project_result(record: RawResult, subject: &Subject) -> TestResult {
    let scenario = record.data.get("scenario").and_then(|values| values.first()).cloned();
    TestResult {
        id: ResultId::new(record.id),
        testcase: TestCaseName::new(record.testcase.name),
        outcome: Outcome::from(record.outcome),
        scenario,
        subject: subject.clone(),
    }
}

/// Projects a raw waiver record onto the core waiver type.
fn project_waiver(record: RawWaiver) -> Result<Waiver, ResolveError> {
    let subject = Subject::new(record.subject)
        .map_err(|err| ResolveError::InvalidResponse(format!("waiver {}: {err}", record.id)))?;
    Ok(Waiver {
        id: WaiverId::new(record.id),
        subject,
        testcase: TestCaseName::new(record.testcase),
        product_version: ProductVersion::new(record.product_version),
        waived: record.waived,
    })
}
