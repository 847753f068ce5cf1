//! Archival date derivation for closed zaken.
//!
//! The brondatum (start of the archiving term) is derived according to the
//! `afleidingswijze` configured on the resultaattype. Only the derivation from the
//! zaak end date is computed here; the other derivations are left to the zaken API.

use chrono::NaiveDate;
use tracing::warn;

use super::period::PeriodError;
use super::zrc::Zaak;
use super::ztc::{Afleidingswijze, BrondatumArchiefprocedure, ResultaatType};

#[derive(Debug, thiserror::Error)]
pub enum ArchivingError {
    #[error(
        "resultaattype '{resultaattype}' derives its brondatum from an eigenschap but has no datumkenmerk"
    )]
    MissingDatumkenmerk { resultaattype: String },
    #[error("a brondatum value is required for eigenschap '{datumkenmerk}' to close the zaak")]
    MissingBrondatumEigenschap { datumkenmerk: String },
    #[error(transparent)]
    Period(#[from] PeriodError),
}

/// What closing a zaak with a given resultaattype requires up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseRequirement {
    Nothing,
    /// The brondatum is read from the zaakeigenschap with this name.
    Eigenschap { datumkenmerk: String },
}

pub fn close_requirement(resultaattype: &ResultaatType) -> Result<CloseRequirement, ArchivingError> {
    let Some(procedure) = &resultaattype.brondatum_archiefprocedure else {
        return Ok(CloseRequirement::Nothing);
    };

    match procedure.afleidingswijze {
        Afleidingswijze::Eigenschap => {
            let datumkenmerk = procedure
                .datumkenmerk
                .as_deref()
                .map(str::trim)
                .filter(|kenmerk| !kenmerk.is_empty())
                .ok_or_else(|| ArchivingError::MissingDatumkenmerk {
                    resultaattype: resultaattype.url.clone(),
                })?;
            Ok(CloseRequirement::Eigenschap {
                datumkenmerk: datumkenmerk.to_string(),
            })
        }
        Afleidingswijze::Afgehandeld
        | Afleidingswijze::AnderDatumkenmerk
        | Afleidingswijze::GerelateerdeZaak
        | Afleidingswijze::Hoofdzaak
        | Afleidingswijze::IngangsdatumBesluit
        | Afleidingswijze::Termijn
        | Afleidingswijze::VervaldatumBesluit
        | Afleidingswijze::Zaakobject => Ok(CloseRequirement::Nothing),
    }
}

/// The brondatum for a closed zaak, when this service can derive it.
pub fn brondatum(zaak: &Zaak, procedure: &BrondatumArchiefprocedure) -> Option<NaiveDate> {
    match procedure.afleidingswijze {
        Afleidingswijze::Afgehandeld => zaak.einddatum,
        unsupported @ (Afleidingswijze::AnderDatumkenmerk
        | Afleidingswijze::Eigenschap
        | Afleidingswijze::GerelateerdeZaak
        | Afleidingswijze::Hoofdzaak
        | Afleidingswijze::IngangsdatumBesluit
        | Afleidingswijze::Termijn
        | Afleidingswijze::VervaldatumBesluit
        | Afleidingswijze::Zaakobject) => {
            warn!(
                zaak = %zaak.identificatie,
                afleidingswijze = ?unsupported,
                "brondatum derivation not supported"
            );
            None
        }
    }
}

/// `brondatum + archiefactietermijn`, only when both the term and a derivable
/// brondatum are configured for the resultaattype.
pub fn archiefactiedatum(
    zaak: &Zaak,
    resultaattype: &ResultaatType,
) -> Result<Option<NaiveDate>, ArchivingError> {
    let (Some(termijn), Some(procedure)) = (
        resultaattype.archiefactietermijn.as_ref(),
        resultaattype.brondatum_archiefprocedure.as_ref(),
    ) else {
        return Ok(None);
    };

    match brondatum(zaak, procedure) {
        Some(brondatum) => Ok(Some(termijn.add_to(brondatum)?)),
        None => Ok(None),
    }
}
