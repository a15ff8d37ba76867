//! Parallel reading, merging and incremental rebuilds
//!
//! Workers each read a share of the documents into their own `DomainData`, ship it back as
//! a snapshot, and the coordinator merges the snapshots restricted to the documents each
//! worker read.

use coq_domain::coq::diagnostics::codes;
use coq_domain::coq::registry::ENV_VERSION;
use coq_domain::{
    CoqDomain, Diagnostics, DocumentContext, DomainData, DomainError, ObjectDeclaration,
    SourceLocation, Subdomain, XrefRole,
};
use std::collections::HashSet;
use std::thread;

type Document = (&'static str, Vec<(&'static str, &'static str)>);

fn corpus() -> Vec<Document> {
    vec![
        (
            "commands",
            vec![("cmd", "Print @qualid."), ("cmd", "Set Printing All.")],
        ),
        ("tactics", vec![("tacn", "simpl"), ("tacn", "intros")]),
        (
            "grammar",
            vec![("prodn", "term ::= @ident"), ("prodn", "term += @num")],
        ),
        (
            "errors",
            vec![("exn", "No such goal."), ("warn", "Unused variable @ident.")],
        ),
    ]
}

fn read_document(
    domain: &CoqDomain,
    data: &mut DomainData,
    document: &Document,
    diags: &mut Diagnostics,
) {
    let (docname, declarations) = document;
    let mut doc = DocumentContext::new(*docname);
    for (line, (directive, signature)) in declarations.iter().enumerate() {
        let mut declaration =
            ObjectDeclaration::new(*directive, SourceLocation::new(*docname, Some(line + 1)))
                .signature(*signature)
                .with_content();
        if *directive == "tacn" {
            declaration = declaration.name(*signature);
        }
        domain
            .describe(data, &mut doc, &declaration, diags)
            .expect("corpus declarations are well-formed");
    }
}

fn read_all(documents: &[Document]) -> DomainData {
    let domain = CoqDomain::default();
    let mut data = DomainData::new();
    let mut diags = Diagnostics::new();
    for document in documents {
        read_document(&domain, &mut data, document, &mut diags);
    }
    data
}

#[test]
fn parallel_workers_match_a_serial_build() {
    let documents = corpus();
    let serial = read_all(&documents);

    let shares: Vec<Vec<Document>> = vec![documents[..2].to_vec(), documents[2..].to_vec()];
    let handles: Vec<_> = shares
        .into_iter()
        .map(|share| {
            thread::spawn(move || {
                let docnames: HashSet<String> =
                    share.iter().map(|(name, _)| name.to_string()).collect();
                let snapshot = read_all(&share).to_snapshot().unwrap();
                (docnames, snapshot)
            })
        })
        .collect();

    let mut merged = DomainData::new();
    let mut diags = Diagnostics::new();
    for handle in handles {
        let (docnames, snapshot) = handle.join().unwrap();
        let worker = DomainData::from_snapshot(&snapshot).unwrap();
        merged.merge(&worker, &docnames, &mut diags);
    }

    assert!(diags.is_empty());
    assert_eq!(merged, serial);
    assert_eq!(merged.tokens().resolve_token("term").unwrap().docname, "grammar");
}

#[test]
fn merge_only_takes_the_workers_documents() {
    let documents = corpus();
    // A worker whose data still holds a stale copy of "commands"
    let worker = read_all(&documents);
    let docnames: HashSet<String> = ["tactics".to_string()].into_iter().collect();

    let mut merged = DomainData::new();
    let mut diags = Diagnostics::new();
    merged.merge(&worker, &docnames, &mut diags);

    assert!(merged.objects.get(Subdomain::Tacn, "simpl").is_some());
    assert!(merged.objects.get(Subdomain::Cmd, "Print").is_none());
    assert!(merged.tokens().is_empty());
}

#[test]
fn merging_overlapping_workers_reports_duplicates() {
    let documents = corpus();
    let first = read_all(&documents[1..2]);
    let second = read_all(&documents[1..2]);
    let docnames: HashSet<String> = ["tactics".to_string()].into_iter().collect();

    let mut merged = DomainData::new();
    let mut diags = Diagnostics::new();
    merged.merge(&first, &docnames, &mut diags);
    let after_first = merged.clone();
    merged.merge(&second, &docnames, &mut diags);

    assert_eq!(merged, after_first);
    let duplicates: Vec<_> = diags.with_code(codes::DUPLICATE_DECLARATION).collect();
    assert_eq!(duplicates.len(), 2);
    assert_eq!(
        duplicates[0].message,
        "Duplicate declaration: 'intros' also defined in 'tactics'."
    );
}

#[test]
fn clearing_a_document_makes_its_names_dangle() {
    let domain = CoqDomain::default();
    let mut data = read_all(&corpus());
    let mut diags = Diagnostics::new();
    let reader = SourceLocation::new("index", Some(7));

    assert!(domain
        .resolve_xref(&data, &reader, XrefRole::Object(Subdomain::Tacn), "simpl", &mut diags)
        .is_some());

    data.clear_doc("tactics");
    assert!(domain
        .resolve_xref(&data, &reader, XrefRole::Object(Subdomain::Tacn), "simpl", &mut diags)
        .is_none());
    assert_eq!(
        diags.iter().map(|d| d.message.as_str()).collect::<Vec<_>>(),
        vec!["coq:tacn reference target not found: simpl"]
    );
    assert!(data.objects.get(Subdomain::Cmd, "Print").is_some());

    data.clear_doc("grammar");
    assert!(data.tokens().resolve_token("term").is_none());
}

#[test]
fn rereading_a_cleared_document_restores_it_without_warnings() {
    let documents = corpus();
    let domain = CoqDomain::default();
    let mut data = read_all(&documents);
    let before = data.clone();
    let mut diags = Diagnostics::new();

    data.clear_doc("commands");
    read_document(&domain, &mut data, &documents[0], &mut diags);

    assert!(diags.is_empty());
    assert_eq!(data, before);
}

#[test]
fn snapshots_from_another_version_are_rejected() {
    let data = read_all(&corpus());
    let snapshot = data.to_snapshot().unwrap();
    let stale = snapshot.replacen(
        &format!("\"env_version\":{}", ENV_VERSION),
        &format!("\"env_version\":{}", ENV_VERSION + 1),
        1,
    );
    assert_ne!(stale, snapshot);
    assert!(matches!(
        DomainData::from_snapshot(&stale),
        Err(DomainError::Snapshot(_))
    ));
    assert!(matches!(
        DomainData::from_snapshot("not json"),
        Err(DomainError::Snapshot(_))
    ));
}

#[test]
fn index_pages_are_built_from_merged_data() {
    let domain = CoqDomain::default();
    let data = read_all(&corpus());

    let commands = domain.find_index_by_name("cmdindex").unwrap();
    let content = commands.generate(&data.objects, domain.descriptors(), None);
    let displays: Vec<_> = content.rows().map(|row| row.display.as_str()).collect();
    assert_eq!(displays, vec!["Print (cmd)", "Set Printing All (cmd)"]);

    let errors = domain.find_index_by_name("exnindex").unwrap();
    let content = errors.generate(&data.objects, domain.descriptors(), None);
    let names: Vec<_> = content.rows().map(|row| row.name.as_str()).collect();
    assert_eq!(names, vec!["No such goal", "Unused variable ‘ident’"]);
}
