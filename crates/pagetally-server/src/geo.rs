//! Country lookup for visitor addresses.

use std::net::IpAddr;

use maxminddb::Reader;
use tracing::trace;

/// Resolves a network address to an English country name.
///
/// A miss (unparsable address, private range, no record) is `None`, never an
/// error.
pub trait CountryLookup: Send + Sync + 'static {
    fn country(&self, ip: &str) -> Option<String>;
}

/// MaxMind GeoLite2 / GeoIP2 Country (or City) database, read once at startup.
pub struct MaxMindCountry {
    reader: Reader<Vec<u8>>,
}

impl MaxMindCountry {
    pub fn open(path: &str) -> Result<Self, maxminddb::MaxMindDbError> {
        let reader = Reader::open_readfile(path)?;
        Ok(Self { reader })
    }
}

impl CountryLookup for MaxMindCountry {
    fn country(&self, ip: &str) -> Option<String> {
        let ip_addr: IpAddr = ip.parse().ok()?;

        let result = self.reader.lookup(ip_addr).ok()?;
        let record: maxminddb::geoip2::Country = result.decode().ok()??;
        let name = record.country.names.english.map(str::to_string);

        trace!(ip, country = ?name, "MaxMind lookup");
        name
    }
}
