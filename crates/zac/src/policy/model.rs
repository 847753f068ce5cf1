use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// The user on whose behalf a request is handled, as established by the
/// authenticating proxy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggedInUser {
    pub id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub groups: BTreeSet<String>,
    pub roles: BTreeSet<String>,
    /// Zaaktype omschrijvingen the user may work on; `None` grants all zaaktypen.
    pub zaaktypen: Option<BTreeSet<String>>,
}

impl LoggedInUser {
    pub fn full_name(&self) -> String {
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .collect();
        if parts.is_empty() {
            self.id.clone()
        } else {
            parts.join(" ")
        }
    }

    pub fn is_in_group(&self, group_id: &str) -> bool {
        self.groups.contains(group_id)
    }

    pub fn is_authorised_for_zaaktype(&self, omschrijving: &str) -> bool {
        self.zaaktypen
            .as_ref()
            .map_or(true, |zaaktypen| zaaktypen.contains(omschrijving))
    }
}

/// The rule packages deployed to the policy engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyRule {
    Zaak,
    Document,
    Taak,
    Overig,
    Werklijst,
}

impl PolicyRule {
    pub fn path(self) -> &'static str {
        match self {
            PolicyRule::Zaak => "zaak/zaak_rechten",
            PolicyRule::Document => "document/document_rechten",
            PolicyRule::Taak => "taak/taak_rechten",
            PolicyRule::Overig => "overig/overige_rechten",
            PolicyRule::Werklijst => "werklijst/werklijst_rechten",
        }
    }
}

/// Declares a rights document: every field is a permission, absent fields are denied.
macro_rules! rechten {
    ($(#[$meta:meta])* $name:ident { $($field:ident),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase", default)]
        pub struct $name {
            $(pub $field: bool,)+
        }

        impl $name {
            /// Every permission granted.
            pub fn granted() -> Self {
                Self { $($field: true,)+ }
            }
        }
    };
}

rechten!(ZaakRechten {
    lezen,
    wijzigen,
    toekennen,
    behandelen,
    afbreken,
    heropenen,
    bekijken_zaakdata,
    wijzigen_doorlooptijd,
    verlengen,
    verlengen_doorlooptijd,
    opschorten,
    hervatten,
    creeeren_document,
    toevoegen_document,
    toevoegen_bag_object,
    toevoegen_initiator_persoon,
    toevoegen_initiator_bedrijf,
    verwijderen_initiator,
    toevoegen_betrokkene_persoon,
    toevoegen_betrokkene_bedrijf,
    verwijderen_betrokkene,
    versturen_email,
    versturen_ontvangstbevestiging,
    starten_taak,
    vastleggen_besluit,
    wijzigen_locatie,
    koppelen,
});

rechten!(DocumentRechten {
    lezen,
    wijzigen,
    verwijderen,
    vergrendelen,
    ontgrendelen,
    ondertekenen,
    toevoegen_nieuwe_versie,
    koppelen,
    downloaden,
    versturen,
});

rechten!(TaakRechten {
    lezen,
    wijzigen,
    toekennen,
    toevoegen_document,
});

rechten!(OverigeRechten {
    starten_zaak,
    beheren,
    zoeken,
});

rechten!(WerklijstRechten {
    inbox,
    ontkoppelde_documenten_verwijderen,
    inbox_productaanvragen_verwijderen,
    zaken_taken,
    zaken_taken_verdelen,
    zaken_taken_exporteren,
});

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ZaakData {
    pub open: bool,
    pub zaaktype: Option<String>,
    pub opgeschort: bool,
    pub verlengd: bool,
    pub besloten: bool,
    pub intake: bool,
    pub heropend: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentData {
    pub definitief: bool,
    pub vergrendeld: bool,
    pub vergrendeld_door: Option<String>,
    pub ondertekend: bool,
    pub zaak_open: Option<bool>,
    pub zaaktype: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaakData {
    pub open: bool,
    pub zaaktype: Option<String>,
}
