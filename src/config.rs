use crate::fields::REQUIRED_HEADERS;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestConfig {
    pub header_row: usize,
    pub data_start_row: usize,
    /// How many of the required header names must be present to accept a sheet.
    pub min_header_matches: usize,
    /// Number of columns searched after a block's session columns for the
    /// engagement, action, follow-up and assessment labels of that week.
    pub block_lookahead: usize,
    /// Length of the week list offered to consumers, regardless of the blocks found.
    pub canonical_weeks: u32,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            header_row: 1,
            data_start_row: 2,
            min_header_matches: 8,
            block_lookahead: 4,
            canonical_weeks: 8,
        }
    }
}

impl IngestConfig {
    pub fn with_min_header_matches(mut self, matches: usize) -> Self {
        self.min_header_matches = matches;
        self
    }

    pub fn with_block_lookahead(mut self, lookahead: usize) -> Self {
        self.block_lookahead = lookahead;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.min_header_matches == 0 || self.min_header_matches > REQUIRED_HEADERS.len() {
            return Err(format!(
                "min header matches must be between 1 and {}, got {}",
                REQUIRED_HEADERS.len(),
                self.min_header_matches
            ));
        }
        if self.block_lookahead == 0 {
            return Err("block lookahead must be at least 1 column".to_string());
        }
        if self.data_start_row <= self.header_row {
            return Err("data rows must start below the header row".to_string());
        }
        Ok(())
    }
}
