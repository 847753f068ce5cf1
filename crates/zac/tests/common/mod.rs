#![allow(dead_code)]

use serde_json::{json, Value};
use uuid::Uuid;
use wiremock::MockServer;
use zac::config::ZgwConfig;
use zac::zgw::ZgwHttpClient;

pub const CLIENT_ID: &str = "zac_client";
pub const SECRET: &str = "a-very-secret-secret-of-sufficient-length";

/// Base URL of the mock server with the trailing slash the clients expect.
pub fn base_url(server: &MockServer) -> String {
    format!("{}/", server.uri())
}

pub fn zgw_http(server: &MockServer) -> ZgwHttpClient {
    ZgwHttpClient::new(&ZgwConfig {
        api_url: base_url(server),
        client_id: CLIENT_ID.to_string(),
        secret: SECRET.to_string(),
    })
}

pub fn zaak_json(server: &MockServer, uuid: Uuid) -> Value {
    json!({
        "url": format!("{}zaken/api/v1/zaken/{uuid}", base_url(server)),
        "uuid": uuid,
        "identificatie": "ZAAK-2024-0000001",
        "bronorganisatie": "123443210",
        "verantwoordelijkeOrganisatie": "316245124",
        "zaaktype": format!("{}catalogi/api/v1/zaaktypen/{}", base_url(server), Uuid::nil()),
        "registratiedatum": "2024-03-01",
        "startdatum": "2024-03-01",
        "uiterlijkeEinddatumAfdoening": "2024-03-11",
        "vertrouwelijkheidaanduiding": "openbaar",
    })
}

pub fn rol_json(server: &MockServer, zaak_url: &str, identificatie: &str) -> Value {
    let uuid = Uuid::new_v4();
    json!({
        "url": format!("{}zaken/api/v1/rollen/{uuid}", base_url(server)),
        "uuid": uuid,
        "zaak": zaak_url,
        "roltype": format!("{}catalogi/api/v1/roltypen/{}", base_url(server), Uuid::nil()),
        "roltoelichting": "Belanghebbende",
        "betrokkeneType": "natuurlijk_persoon",
        "betrokkeneIdentificatie": { "inpBsn": identificatie },
    })
}
