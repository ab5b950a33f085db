// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, anyhow};
use helpdesk_api::Client;
use helpdesk_app::forms::{Credentials, CustomerDraft, TicketDraft};
use helpdesk_app::{
    ApiError, Authenticator, Customer, CustomerId, Directory, RecordStore, SearchField,
    TechnicianId, Technician, TicketId, TicketRecord,
};
use std::io::Read;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tiny_http::{Header, Response, Server};

struct Expected {
    method: &'static str,
    url: &'static str,
    status: u16,
    body: &'static str,
}

/// Seen by the mock server: method, url, authorization header, body.
type Seen = (String, String, Option<String>, String);

fn mock(exchanges: Vec<Expected>) -> Result<(String, JoinHandle<Vec<Seen>>)> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}/api", server.server_addr());
    let handle = thread::spawn(move || {
        let mut seen = Vec::new();
        for expected in exchanges {
            let mut request = server.recv().expect("request expected");
            let mut body = String::new();
            request
                .as_reader()
                .read_to_string(&mut body)
                .expect("request body readable");
            let auth = request
                .headers()
                .iter()
                .find(|header| header.field.equiv("Authorization"))
                .map(|header| header.value.as_str().to_owned());
            assert_eq!(request.method().as_str(), expected.method);
            assert_eq!(request.url(), expected.url);
            seen.push((
                request.method().as_str().to_owned(),
                request.url().to_owned(),
                auth,
                body,
            ));
            let response = Response::from_string(expected.body)
                .with_status_code(expected.status)
                .with_header(
                    Header::from_bytes("Content-Type", "application/json")
                        .expect("valid content type header"),
                );
            request.respond(response).expect("response should succeed");
        }
        seen
    });
    Ok((addr, handle))
}

#[test]
fn unreachable_backend_names_the_config_key() {
    let mut client =
        Client::new("http://127.0.0.1:1/api", Duration::from_millis(50)).expect("client");
    let error = Directory::<Customer>::list_all(&mut client).expect_err("nothing listening");
    assert!(matches!(error, ApiError::Unreachable { .. }));
    assert!(error.to_string().contains("[api].base_url"));
}

#[test]
fn list_all_unwraps_plural_envelope() -> Result<()> {
    let (addr, handle) = mock(vec![Expected {
        method: "GET",
        url: "/api/clientes/listar",
        status: 200,
        body: r#"{"clientes":[{"_id":"c1","nombre":"Ana","apellido":"Ruiz","cedula":"1712345678"},{"_id":"c2","nombre":"Luis"}]}"#,
    }])?;
    let mut client = Client::new(&addr, Duration::from_secs(2))?;
    let customers: Vec<Customer> = client.list_all()?;
    assert_eq!(customers.len(), 2);
    assert_eq!(customers[0].details.national_id, "1712345678");
    handle.join().map_err(|_| anyhow!("server thread panicked"))?;
    Ok(())
}

#[test]
fn find_by_sends_field_key_and_normalizes_single_object() -> Result<()> {
    let (addr, handle) = mock(vec![
        Expected {
            method: "GET",
            url: "/api/tecnicos/buscar?cedula=0912345678",
            status: 200,
            body: r#"{"tecnico":{"_id":"k1","nombre":"Luis","genero":"Masculino"}}"#,
        },
        Expected {
            method: "GET",
            url: "/api/tecnicos/buscar?apellido=Mora+Paz",
            status: 404,
            body: r#"{"msg":"No encontrado"}"#,
        },
    ])?;
    let mut client = Client::new(&addr, Duration::from_secs(2))?;
    let found: Vec<Technician> = client.find_by(SearchField::NationalId, "0912345678")?;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, TechnicianId::new("k1"));
    let missing: Vec<Technician> = client.find_by(SearchField::Surname, "Mora Paz")?;
    assert!(missing.is_empty());
    handle.join().map_err(|_| anyhow!("server thread panicked"))?;
    Ok(())
}

#[test]
fn fetch_treats_404_as_absent() -> Result<()> {
    let (addr, handle) = mock(vec![
        Expected {
            method: "GET",
            url: "/api/tickets/buscarid/t1",
            status: 200,
            body: r#"{"ticket":{"_id":"t1","codigo":"TK-1","descripcion":"Sin red en bodega","cliente":{"_id":"c1","cedula":"1712345678"},"tecnico":"k1"}}"#,
        },
        Expected {
            method: "GET",
            url: "/api/tickets/buscarid/t2",
            status: 404,
            body: "",
        },
    ])?;
    let mut client = Client::new(&addr, Duration::from_secs(2))?;
    let ticket: Option<TicketRecord> = client.fetch(&TicketId::new("t1"))?;
    let ticket = ticket.ok_or_else(|| anyhow!("ticket expected"))?;
    assert_eq!(
        ticket.customer.as_ref().map(|linked| linked.id().as_str()),
        Some("c1")
    );
    let missing: Option<TicketRecord> = client.fetch(&TicketId::new("t2"))?;
    assert!(missing.is_none());
    handle.join().map_err(|_| anyhow!("server thread panicked"))?;
    Ok(())
}

#[test]
fn login_then_requests_carry_bearer_token() -> Result<()> {
    let (addr, handle) = mock(vec![
        Expected {
            method: "POST",
            url: "/api/auth/login",
            status: 200,
            body: r#"{"token":"abc123","usuario":{"_id":"u1","nombre":"Ana","apellido":"Ruiz","email":"ana@example.com"},"msg":"Bienvenida"}"#,
        },
        Expected {
            method: "POST",
            url: "/api/tickets/crear",
            status: 201,
            body: r#"{"msg":"Ticket registrado"}"#,
        },
    ])?;
    let mut client = Client::new(&addr, Duration::from_secs(2))?;
    let grant = client.login(&Credentials::new("ana@example.com", "secreto"))?;
    assert_eq!(grant.user.name, "Ana");
    assert_eq!(grant.message.as_deref(), Some("Bienvenida"));
    client.use_token(Some(&grant.token));

    let draft = TicketDraft {
        code: "TK-9".to_owned(),
        description: "Monitor sin señal".to_owned(),
        customer: Some(CustomerId::new("c1")),
        technician: Some(TechnicianId::new("k1")),
    };
    let saved = RecordStore::<TicketRecord>::create(&mut client, &draft)?;
    assert!(saved.record.is_none());
    assert_eq!(saved.message.as_deref(), Some("Ticket registrado"));

    let seen = handle.join().map_err(|_| anyhow!("server thread panicked"))?;
    assert_eq!(seen[0].2, None);
    let login_body: serde_json::Value = serde_json::from_str(&seen[0].3)?;
    assert_eq!(login_body["email"], "ana@example.com");
    assert_eq!(seen[1].2.as_deref(), Some("Bearer abc123"));
    let ticket_body: serde_json::Value = serde_json::from_str(&seen[1].3)?;
    assert_eq!(ticket_body["codigo"], "TK-9");
    assert_eq!(ticket_body["cliente"], "c1");
    Ok(())
}

#[test]
fn rejections_carry_backend_text() -> Result<()> {
    let (addr, handle) = mock(vec![
        Expected {
            method: "PUT",
            url: "/api/clientes/actualizar/c1",
            status: 400,
            body: r#"{"error":"La cédula ya existe"}"#,
        },
        Expected {
            method: "GET",
            url: "/api/clientes/listar",
            status: 200,
            body: r#"{"error":"Token expirado"}"#,
        },
        Expected {
            method: "DELETE",
            url: "/api/clientes/eliminar/c1",
            status: 200,
            body: r#"{"msg":"Cliente eliminado"}"#,
        },
    ])?;
    let mut client = Client::new(&addr, Duration::from_secs(2))?;
    let error = RecordStore::<Customer>::update(
        &mut client,
        &CustomerId::new("c1"),
        &CustomerDraft::default(),
    )
    .expect_err("rejected update");
    assert_eq!(error.user_message(), Some("La cédula ya existe"));

    let error =
        Directory::<Customer>::list_all(&mut client).expect_err("error body on success status");
    assert_eq!(error.user_message(), Some("Token expirado"));

    let message = RecordStore::<Customer>::delete(&mut client, &CustomerId::new("c1"))?;
    assert_eq!(message.as_deref(), Some("Cliente eliminado"));
    handle.join().map_err(|_| anyhow!("server thread panicked"))?;
    Ok(())
}
