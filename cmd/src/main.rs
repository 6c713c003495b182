//! Thin demo CLI: builds a query for a name given on the command line,
//! resolves it iteratively with DNSSEC validation against a UDP
//! transport, and prints the answer plus the validation grade it earned.

mod transport;

use anyhow::Result;
use dnscore::crypto::DefaultCryptoProvider;
use dnscore::dns::rdata::{CLASS_IN, TYPE_A};
use dnscore::dns::DomainName;
use dnscore::dnssec::trust_anchor::TrustAnchorStore;
use dnscore::dnssec::DnsSecValidator;
use dnscore::resolver::{IterativeResolver, ResolverConfig, SecureStubResolver};
use transport::UdpTransport;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let name = std::env::args().nth(1).unwrap_or_else(|| "example.com.".to_string());
    let qname = DomainName::from_text(&name)?;

    let iterative = IterativeResolver::new(UdpTransport, ResolverConfig::default());
    // No trust anchors configured: every secured zone validates as
    // Indeterminate here. A real deployment would seed the root KSK.
    let validator = DnsSecValidator::new(DefaultCryptoProvider::new(), TrustAnchorStore::new());
    let resolver = SecureStubResolver::new(iterative, validator);

    let (records, grade) = resolver.resolve(&qname, TYPE_A, CLASS_IN).await?;

    println!("query: {qname} A");
    println!("validation: {grade:?}");
    for rr in &records {
        println!("{rr:?}");
    }
    if records.is_empty() {
        println!("(no records)");
    }
    Ok(())
}
