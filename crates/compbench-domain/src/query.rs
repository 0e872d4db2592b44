//! Query type module - the fixed set of extraction templates

use serde::{Deserialize, Serialize};

/// Extraction template, identified on the wire by its number (1-5)
///
/// Each query type targets a different slice of compensation disclosure:
/// - Basic: company, fiscal year and headline pay per executive
/// - Detailed: every pay component per executive
/// - Equity: equity plans, grants and vesting schedules
/// - Kpi: short- and long-term incentive metrics with targets
/// - Policies: clawback, ownership guidelines and governance details
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum QueryType {
    /// Query 1
    Basic,

    /// Query 2
    Detailed,

    /// Query 3
    Equity,

    /// Query 4
    Kpi,

    /// Query 5
    Policies,
}

impl QueryType {
    /// All query types in numeric order
    pub const ALL: [QueryType; 5] = [
        QueryType::Basic,
        QueryType::Detailed,
        QueryType::Equity,
        QueryType::Kpi,
        QueryType::Policies,
    ];

    /// Numeric identifier used in prompts, file names and reports
    pub fn number(&self) -> u8 {
        match self {
            QueryType::Basic => 1,
            QueryType::Detailed => 2,
            QueryType::Equity => 3,
            QueryType::Kpi => 4,
            QueryType::Policies => 5,
        }
    }

    /// Look up a query type by number
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(QueryType::Basic),
            2 => Some(QueryType::Detailed),
            3 => Some(QueryType::Equity),
            4 => Some(QueryType::Kpi),
            5 => Some(QueryType::Policies),
            _ => None,
        }
    }

    /// Human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            QueryType::Basic => "Basic Compensation",
            QueryType::Detailed => "Detailed Compensation",
            QueryType::Equity => "Equity Plans",
            QueryType::Kpi => "KPI Metrics",
            QueryType::Policies => "Policies & Governance",
        }
    }

    /// File name of the prompt template for this query
    pub fn prompt_file(&self) -> &'static str {
        match self {
            QueryType::Basic => "1_basic_compensation.txt",
            QueryType::Detailed => "2_detailed_compensation.txt",
            QueryType::Equity => "3_equity_plans.txt",
            QueryType::Kpi => "4_kpi_metrics.txt",
            QueryType::Policies => "5_policies_governance.txt",
        }
    }

    /// Parse a comma-separated list such as `"1,2,5"`, preserving order
    pub fn parse_list(s: &str) -> Result<Vec<Self>, String> {
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::parse)
            .collect()
    }
}

impl std::fmt::Display for QueryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.number())
    }
}

impl From<QueryType> for u8 {
    fn from(query: QueryType) -> Self {
        query.number()
    }
}

impl TryFrom<u8> for QueryType {
    type Error = String;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        Self::from_number(n).ok_or_else(|| format!("Invalid query type: {}. Must be 1-5.", n))
    }
}

impl std::str::FromStr for QueryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let n: u8 = s
            .trim()
            .parse()
            .map_err(|_| format!("Invalid query type: {}. Must be 1-5.", s))?;
        Self::try_from(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_round_trip() {
        for query in QueryType::ALL {
            assert_eq!(QueryType::from_number(query.number()), Some(query));
        }
        assert_eq!(QueryType::from_number(0), None);
        assert_eq!(QueryType::from_number(6), None);
    }

    #[test]
    fn test_parse_list_preserves_order() {
        let queries = QueryType::parse_list("3, 1,5").unwrap();
        assert_eq!(queries, vec![QueryType::Equity, QueryType::Basic, QueryType::Policies]);
    }

    #[test]
    fn test_parse_list_rejects_out_of_range() {
        assert!(QueryType::parse_list("1,7").is_err());
        assert!(QueryType::parse_list("one").is_err());
    }

    #[test]
    fn test_serializes_as_number() {
        let json = serde_json::to_string(&QueryType::Kpi).unwrap();
        assert_eq!(json, "4");

        let parsed: QueryType = serde_json::from_str("2").unwrap();
        assert_eq!(parsed, QueryType::Detailed);
        assert!(serde_json::from_str::<QueryType>("9").is_err());
    }

    #[test]
    fn test_display_names() {
        assert_eq!(QueryType::Basic.display_name(), "Basic Compensation");
        assert_eq!(QueryType::Policies.display_name(), "Policies & Governance");
        assert_eq!(QueryType::Equity.prompt_file(), "3_equity_plans.txt");
    }
}
