// dqi-core/src/lib.rs

// 1. Mandatory documentation for production code
#![allow(missing_docs)] // On autorise le manque de doc pour le moment

// 2. Memory safety
#![deny(unsafe_code)]
// 3. Robustness
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
// 4. Performance
#![warn(clippy::perf)]

// --- MODULES HEXAGONAUX ---

// 1. Ports (Interfaces / Traits)
// Le contrat RecordStore : tout ce que le moteur attend du stockage.
pub mod ports;

// 2. Domain (Cœur du métier)
// Notes A-F, statut des marts, synthèses, normalisation des imports.
// Ne dépend de RIEN d'autre (ni infra, ni app).
pub mod domain;

// 3. Infrastructure (Adapters)
// Stores (mémoire, DuckDB), lecture CSV/JSON, configuration YAML.
pub mod infrastructure;

// 4. Application (Use Cases)
// QualityEngine, import, report card.
pub mod application;

// --- GESTION DES ERREURS GLOBALE ---
pub mod error;

// --- RE-EXPORTS (FACADE) ---
// Permet d'importer l'erreur principale facilement : use dqi_core::DqiError;
pub use error::DqiError;
