//! Startup seeding of the remedy store.

use std::path::Path;

use super::{RemedyRecord, RemedyStore};
use crate::error::StoreError;

/// The remedy set installed into an empty store.
pub fn default_remedies() -> Vec<RemedyRecord> {
    vec![
        RemedyRecord::new(
            "Digestive Issues",
            "bloating, gas, indigestion, constipation, irregular appetite",
            &["Triphala", "Ginger"],
            "Take Triphala powder with warm water before bed. Sip ginger tea after meals, \
             eat at regular times and avoid heavy food late at night.",
        )
        .with_precautions("Avoid Triphala during pregnancy; reduce the dose if stools become loose"),
        RemedyRecord::new(
            "Stress and Anxiety",
            "nervousness, restlessness, racing thoughts, tension",
            &["Ashwagandha", "Brahmi", "Tulsi"],
            "Take Ashwagandha with warm milk in the evening and Brahmi in the morning. \
             Practise slow breathing (pranayama) for ten minutes daily.",
        )
        .with_precautions("Ashwagandha may interact with thyroid and sedative medication"),
        RemedyRecord::new(
            "Joint Pain",
            "stiffness, swelling, aching joints, reduced mobility",
            &["Turmeric", "Ashwagandha"],
            "Use turmeric in cooking or as golden milk. Massage joints with warm sesame oil \
             and keep up gentle daily movement.",
        )
        .with_precautions("High-dose turmeric supplements may thin the blood"),
        RemedyRecord::new(
            "Sleep Problems",
            "difficulty falling asleep, waking at night, poor sleep quality",
            &["Ashwagandha", "Brahmi"],
            "Keep a fixed bedtime, avoid screens an hour before sleep and take Ashwagandha \
             with warm milk at night.",
        ),
        RemedyRecord::new(
            "Common Cold",
            "cough, sore throat, runny nose, congestion, mucus",
            &["Tulsi", "Ginger", "Turmeric"],
            "Drink Tulsi and ginger tea with honey several times a day and inhale steam \
             before bed.",
        )
        .with_precautions("See a doctor if fever lasts more than three days"),
        RemedyRecord::new(
            "Low Energy",
            "fatigue, weakness, low stamina, exhaustion",
            &["Shatavari", "Ashwagandha"],
            "Take Shatavari or Ashwagandha powder with warm milk daily and eat warm, \
             nourishing meals.",
        ),
    ]
}

/// Installs [`default_remedies`] when the store is empty.
/// Returns `Ok(true)` if records were written, `Ok(false)` if the store already had data.
pub fn seed_default_remedies(store: &RemedyStore) -> Result<bool, StoreError> {
    if store.count()? > 0 {
        return Ok(false);
    }
    for record in default_remedies() {
        store.upsert(&record)?;
    }
    store.flush()?;
    Ok(true)
}

/// Upserts every record of a JSON array file into the store. Returns the number written.
pub fn import_remedies_json<P: AsRef<Path>>(
    store: &RemedyStore,
    path: P,
) -> Result<usize, StoreError> {
    let raw = std::fs::read_to_string(path.as_ref())?;
    let records: Vec<RemedyRecord> = serde_json::from_str(&raw)?;
    for record in &records {
        store.upsert(record)?;
    }
    store.flush()?;
    tracing::info!(
        target: "arogya::remedies",
        path = %path.as_ref().display(),
        count = records.len(),
        "Imported remedy records"
    );
    Ok(records.len())
}
