use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeQuery {
    /// Start date in format YYYY-MM-DD (inclusive)
    pub start_date: String,
    /// End date in format YYYY-MM-DD (inclusive)
    pub end_date: String,
}

impl DateRangeQuery {
    /// Half-open `[start, end)` bounds covering every day from `startDate`
    /// through `endDate`.
    pub fn to_range(&self) -> Result<(NaiveDateTime, NaiveDateTime), String> {
        let start_date = NaiveDate::parse_from_str(&self.start_date, "%Y-%m-%d")
            .map_err(|e| format!("Invalid startDate format: {}", e))?;
        let end_date = NaiveDate::parse_from_str(&self.end_date, "%Y-%m-%d")
            .map_err(|e| format!("Invalid endDate format: {}", e))?;

        if start_date > end_date {
            return Err("startDate must not be after endDate".to_string());
        }

        let start = start_date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| "Invalid startDate time".to_string())?;
        let end = end_date
            .succ_opt()
            .and_then(|next| next.and_hms_opt(0, 0, 0))
            .ok_or_else(|| "Invalid endDate time".to_string())?;

        Ok((start, end))
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TimeSeriesPoint {
    pub date: String,
    pub count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserCounts {
    pub total: u64,
    pub admins: u64,
    pub institutes: u64,
    pub students: u64,
    pub companies: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CertificateCounts {
    pub total: u64,
    pub notarized: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PlatformStatsResponse {
    pub users: UserCounts,
    pub certificates: CertificateCounts,
    pub courses: u64,
    pub open_jobs: u64,
    pub applications: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InstituteStatsResponse {
    pub certificates_issued: u64,
    pub certificates_notarized: u64,
    pub courses: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CertificateStatsResponse {
    pub total: i64,
    pub certificates_per_day: Vec<TimeSeriesPoint>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(start: &str, end: &str) -> DateRangeQuery {
        DateRangeQuery {
            start_date: start.to_string(),
            end_date: end.to_string(),
        }
    }

    #[test]
    fn range_covers_whole_days() {
        let (start, end) = query("2024-05-01", "2024-05-03").to_range().unwrap();
        assert_eq!(start.to_string(), "2024-05-01 00:00:00");
        assert_eq!(end.to_string(), "2024-05-04 00:00:00");

        let last_instant = NaiveDate::from_ymd_opt(2024, 5, 3)
            .unwrap()
            .and_hms_milli_opt(23, 59, 59, 999)
            .unwrap();
        assert!(last_instant < end);
    }

    #[test]
    fn single_day_range() {
        let (start, end) = query("2024-05-03", "2024-05-03").to_range().unwrap();
        assert_eq!(end - start, chrono::Duration::days(1));
    }

    #[test]
    fn rejects_bad_or_inverted_range() {
        assert!(query("2024-13-01", "2024-05-03").to_range().is_err());
        assert!(query("2024-05-04", "2024-05-03").to_range().is_err());
    }
}
