//! Report aggregation
//!
//! Pure functions over documents already fetched from the stores. Every
//! accumulator here is local to one call.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};

use core_kernel::{DateWindow, MedicalRecordId, Money, MoneyError, PatientId};
use domain_billing::{Billing, PaymentStatus};
use domain_records::{PatientCategory, RecordWithPatient};

use crate::reports::{PatientVisitReport, PatientVisitSummary, RevenueReport, ServiceUsage, VisitRow};

/// Sums paid bills created inside the window
///
/// Bills that are not `Paid` or fall outside the window are skipped, so the
/// caller may pass a wider set.
///
/// # Errors
///
/// `MoneyError::Overflow` when the sums leave the decimal range
pub fn revenue_report(period: DateWindow, billings: &[Billing]) -> Result<RevenueReport, MoneyError> {
    let paid: Vec<&Billing> = billings
        .iter()
        .filter(|b| b.payment_status == PaymentStatus::Paid && period.contains(b.created_at))
        .collect();

    let total_revenue = Money::checked_sum(paid.iter().map(|b| b.total_amount))?;
    let total_discount = Money::checked_sum(paid.iter().map(|b| b.discount))?;
    let total_bills = paid.len() as u64;

    Ok(RevenueReport {
        period,
        total_revenue,
        total_bills,
        total_discount,
        average_per_bill: total_revenue.average_over(total_bills),
    })
}

/// Merges record sets, keeping the first copy of each record id
pub fn merge_records<I>(sets: I) -> Vec<RecordWithPatient>
where
    I: IntoIterator<Item = Vec<RecordWithPatient>>,
{
    let mut seen: HashSet<MedicalRecordId> = HashSet::new();
    sets.into_iter()
        .flatten()
        .filter(|r| seen.insert(r.record.id))
        .collect()
}

/// Builds the visit report from records matched on visit date or creation date
///
/// Records are deduplicated by id and listed by visit date. A record whose
/// patient is missing still counts, under "Unspecified", but has no
/// per-patient summary.
pub fn patient_visit_report(period: DateWindow, records: Vec<RecordWithPatient>) -> PatientVisitReport {
    let mut records = merge_records([records]);
    records.sort_by(|a, b| {
        a.record
            .visit_date
            .cmp(&b.record.visit_date)
            .then_with(|| a.record.id.cmp(&b.record.id))
    });

    let mut patient_type_counts: BTreeMap<String, u64> = BTreeMap::new();
    let mut summaries: Vec<PatientVisitSummary> = Vec::new();
    let mut summary_index: HashMap<PatientId, usize> = HashMap::new();

    for entry in &records {
        let category = entry.patient.as_ref().and_then(|p| p.category);
        *patient_type_counts
            .entry(PatientCategory::label_or_unspecified(category).to_string())
            .or_insert(0) += 1;

        let Some(patient) = &entry.patient else { continue };
        match summary_index.get(&patient.id) {
            Some(&i) => summaries[i].visits += 1,
            None => {
                summary_index.insert(patient.id, summaries.len());
                summaries.push(PatientVisitSummary {
                    id: patient.id,
                    name: patient.name.clone(),
                    phone: patient.phone.clone(),
                    category: patient.category,
                    visits: 1,
                });
            }
        }
    }

    let visit_rows = records
        .into_iter()
        .map(|entry| VisitRow {
            id: entry.record.id,
            visit_date: entry.record.visit_date,
            reason: Some(entry.record.symptoms).filter(|s| !s.trim().is_empty()),
            patient: entry.patient,
        })
        .collect::<Vec<_>>();

    PatientVisitReport {
        period,
        total_visits: visit_rows.len() as u64,
        patient_type_counts,
        visit_rows,
        patient_summaries: summaries,
    }
}

/// Ranks service charges on bills
///
/// Each charge line counts once; revenue is `price × (quantity ?? 1)`.
pub fn rank_billed_services(billings: &[Billing], limit: usize) -> Result<Vec<ServiceUsage>, MoneyError> {
    let usages = billings
        .iter()
        .flat_map(|b| b.service_charges.iter())
        .map(|c| c.line_total().map(|total| (c.service_name.as_str(), total)));
    rank(usages, limit)
}

/// Ranks services performed on records
///
/// Record service lines carry no quantity; revenue is the plain price sum.
pub fn rank_recorded_services(
    records: &[RecordWithPatient],
    limit: usize,
) -> Result<Vec<ServiceUsage>, MoneyError> {
    let usages = records
        .iter()
        .flat_map(|r| r.record.services.iter())
        .map(|s| Ok::<_, MoneyError>((s.service_name.as_str(), s.price)));
    rank(usages, limit)
}

/// Orders by count desc, then revenue desc, then name asc
pub fn compare_usage(a: &ServiceUsage, b: &ServiceUsage) -> Ordering {
    b.count
        .cmp(&a.count)
        .then_with(|| b.total_revenue.cmp(&a.total_revenue))
        .then_with(|| a.service_name.cmp(&b.service_name))
}

fn rank<'a>(
    usages: impl Iterator<Item = Result<(&'a str, Money), MoneyError>>,
    limit: usize,
) -> Result<Vec<ServiceUsage>, MoneyError> {
    let mut grouped: HashMap<&'a str, (u64, Money)> = HashMap::new();
    for usage in usages {
        let (name, revenue) = usage?;
        let slot = grouped.entry(name).or_insert((0, Money::zero()));
        slot.0 += 1;
        slot.1 = slot.1.checked_add(&revenue)?;
    }

    let mut ranked: Vec<ServiceUsage> = grouped
        .into_iter()
        .map(|(name, (count, total_revenue))| ServiceUsage {
            service_name: name.to_string(),
            count,
            total_revenue,
        })
        .collect();
    ranked.sort_by(compare_usage);
    ranked.truncate(limit);
    Ok(ranked)
}
