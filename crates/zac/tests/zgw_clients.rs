mod common;

use std::collections::HashSet;

use common::*;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde_json::{json, Value};
use uuid::Uuid;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zac::zgw::zrc::{HttpZrcClient, Opschorting, ZaakPatch, ZrcClient};
use zac::zgw::ztc::{HttpZtcClient, OmschrijvingGeneriek, ZtcClient};
use zac::zgw::{ZgwError, ZgwService};

#[tokio::test]
async fn zaak_reads_carry_crs_headers_and_a_signed_token() {
    let server = MockServer::start().await;
    let uuid = Uuid::new_v4();
    Mock::given(method("GET"))
        .and(path(format!("/zaken/api/v1/zaken/{uuid}")))
        .and(header("Accept-Crs", "EPSG:4326"))
        .and(header("Content-Crs", "EPSG:4326"))
        .respond_with(ResponseTemplate::new(200).set_body_json(zaak_json(&server, uuid)))
        .expect(1)
        .mount(&server)
        .await;

    let zaak = HttpZrcClient::new(zgw_http(&server))
        .read_zaak(uuid)
        .await
        .expect("zaak read");
    assert_eq!(zaak.uuid, uuid);
    assert!(zaak.is_open());

    let requests = server.received_requests().await.expect("recorded requests");
    let authorization = requests[0]
        .headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .expect("authorization header");
    let token = authorization.strip_prefix("Bearer ").expect("bearer token");
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;
    validation.required_spec_claims = HashSet::new();
    let claims = decode::<Value>(
        token,
        &DecodingKey::from_secret(SECRET.as_bytes()),
        &validation,
    )
    .expect("token signed with the client secret")
    .claims;
    assert_eq!(claims["iss"], CLIENT_ID);
    assert_eq!(claims["client_id"], CLIENT_ID);
    assert_eq!(claims["user_representation"], "Zaakafhandelcomponent");
}

#[tokio::test]
async fn missing_resources_are_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let error = HttpZrcClient::new(zgw_http(&server))
        .read_zaak(Uuid::new_v4())
        .await
        .expect_err("no zaak");

    assert!(matches!(
        error,
        ZgwError::NotFound {
            service: ZgwService::Zrc,
            ..
        }
    ));
}

#[tokio::test]
async fn failing_responses_keep_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database unavailable"))
        .mount(&server)
        .await;

    let error = HttpZtcClient::new(zgw_http(&server))
        .read_zaaktype(&format!("{}catalogi/api/v1/zaaktypen/{}", base_url(&server), Uuid::nil()))
        .await
        .expect_err("server error");

    match error {
        ZgwError::Status {
            service,
            status,
            body,
        } => {
            assert_eq!(service, ZgwService::Ztc);
            assert_eq!(status, 500);
            assert_eq!(body, "database unavailable");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[tokio::test]
async fn mutations_send_the_audit_explanation() {
    let server = MockServer::start().await;
    let uuid = Uuid::new_v4();
    let mut suspended = zaak_json(&server, uuid);
    suspended["opschorting"] = json!({ "indicatie": true, "reden": "Wacht op advies" });
    Mock::given(method("PATCH"))
        .and(path(format!("/zaken/api/v1/zaken/{uuid}")))
        .and(header("X-Audit-Toelichting", "Opschorting: Wacht op advies"))
        .and(body_partial_json(json!({
            "opschorting": { "indicatie": true, "reden": "Wacht op advies" },
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(suspended))
        .expect(1)
        .mount(&server)
        .await;

    let patch = ZaakPatch {
        opschorting: Some(Opschorting {
            indicatie: true,
            reden: "Wacht op advies".to_string(),
        }),
        ..ZaakPatch::default()
    };
    let zaak = HttpZrcClient::new(zgw_http(&server))
        .patch_zaak(uuid, &patch, Some("Opschorting: Wacht op advies"))
        .await
        .expect("zaak patched");

    assert!(zaak.is_opgeschort());
}

#[tokio::test]
async fn rollen_are_collected_across_pages() {
    let server = MockServer::start().await;
    let zaak_url = format!("{}zaken/api/v1/zaken/{}", base_url(&server), Uuid::new_v4());
    let second_page = format!("{}zaken/api/v1/rollen?page=2", base_url(&server));
    Mock::given(method("GET"))
        .and(path("/zaken/api/v1/rollen"))
        .and(query_param("page", "1"))
        .and(query_param("zaak", zaak_url.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 2,
            "next": second_page,
            "previous": null,
            "results": [rol_json(&server, &zaak_url, "999993896")],
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/zaken/api/v1/rollen"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 2,
            "next": null,
            "previous": null,
            "results": [rol_json(&server, &zaak_url, "999990019")],
        })))
        .mount(&server)
        .await;

    let rollen = HttpZrcClient::new(zgw_http(&server))
        .list_rollen(&zaak_url)
        .await
        .expect("rollen listed");

    let identificaties: Vec<_> = rollen
        .iter()
        .filter_map(|rol| rol.identificatienummer())
        .collect();
    assert_eq!(identificaties, vec!["999993896", "999990019"]);
}

#[tokio::test]
async fn roltypen_are_filtered_by_generic_description() {
    let server = MockServer::start().await;
    let zaaktype = format!("{}catalogi/api/v1/zaaktypen/{}", base_url(&server), Uuid::nil());
    Mock::given(method("GET"))
        .and(path("/catalogi/api/v1/roltypen"))
        .and(query_param("omschrijvingGeneriek", "initiator"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 1,
            "results": [{
                "url": format!("{}catalogi/api/v1/roltypen/{}", base_url(&server), Uuid::new_v4()),
                "zaaktype": zaaktype,
                "omschrijving": "Aanvrager",
                "omschrijvingGeneriek": "initiator",
            }],
        })))
        .mount(&server)
        .await;

    let roltypen = HttpZtcClient::new(zgw_http(&server))
        .find_roltypen(&zaaktype, OmschrijvingGeneriek::Initiator)
        .await
        .expect("roltypen listed");

    assert_eq!(roltypen.len(), 1);
    assert_eq!(roltypen[0].omschrijving, "Aanvrager");
}
