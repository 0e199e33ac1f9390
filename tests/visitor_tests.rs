// tests/visitor_tests.rs

mod common;

use common::{compile, compile_with, pet_config, pet_schema};
use fiql_predicate::{
    ComparisonOp, CompileError, ErrorKind, Literal, LogicalOp, Node, ParseError, Predicate,
    PredicateVisitor, Value, VisitError, VisitorConfig, compose, parse, parser::MAX_DEPTH,
};

fn compile_err(query: &str) -> VisitError {
    compile_err_with(query, &pet_config())
}

fn compile_err_with(query: &str, config: &VisitorConfig) -> VisitError {
    let schema = pet_schema();
    match PredicateVisitor::new(&schema, "Pet").compile(query, config) {
        Err(CompileError::Visit(e)) => e,
        other => panic!("expected a visit error for {}, got {:?}", query, other),
    }
}

// ============================================================================
// Comparisons on single attributes
// ============================================================================

#[test]
fn test_string_equality() {
    assert_eq!(compile("name=='Max'").to_string(), "eq(name, 'Max')");
    assert_eq!(compile("name!=Max").to_string(), "ne(name, 'Max')");
}

#[test]
fn test_nested_attribute() {
    let predicate = compile("owner.firstName=='Jeff'");
    assert_eq!(predicate.to_string(), "eq(owner.firstName, 'Jeff')");

    let paths = predicate.paths();
    assert_eq!(paths[0].depth(), 2);
    assert!(!paths[0].has_collection_hop());
}

#[test]
fn test_literals_take_the_declared_type() {
    assert_eq!(compile("birthDate=gt=2012-08-31").to_string(), "gt(birthDate, 2012-08-31)");
    assert_eq!(compile("weight=ge=5").to_string(), "ge(weight, 5.0D)");
    assert_eq!(compile("vaccinated==TRUE").to_string(), "eq(vaccinated, true)");
    assert_eq!(
        compile("visits.date==2013-01-04T10:15:00+01:00").to_string(),
        "eq(visits.date, 2013-01-04T09:15:00Z)"
    );
    assert_eq!(
        compile("visits.date=ge=2013-01-04").to_string(),
        "ge(visits.date, 2013-01-04T00:00:00Z)"
    );
}

#[test]
fn test_suffix_overrides_declared_type() {
    match compile("weight==2L") {
        Predicate::Compare { value, .. } => assert_eq!(value, Value::Long(2)),
        other => panic!("expected a comparison, got {}", other),
    }
}

#[test]
fn test_enum_constant() {
    assert_eq!(
        compile("visits.type=='SCHEDULED'"),
        compile("visits.type==SCHEDULED")
    );

    let predicate = compile("visits.type==SCHEDULED");
    assert_eq!(predicate.to_string(), "eq(visits.type, SCHEDULED)");
    assert!(predicate.paths()[0].has_collection_hop());
}

// ============================================================================
// Wildcards
// ============================================================================

#[test]
fn test_wildcard_becomes_like() {
    assert_eq!(compile("name=='*uck*'").to_string(), "like(name, '%uck%')");
    assert_eq!(compile("name!='Ma*'").to_string(), "not_like(name, 'Ma%')");
}

#[test]
fn test_like_escapes_reserved_characters() {
    assert_eq!(compile("name=='50%_off*'").to_string(), r"like(name, '50\%\_off%')");
}

#[test]
fn test_always_wildcard() {
    let config = pet_config().with_always_wildcard(true);

    assert_eq!(compile_with("name=='uck'", &config), compile("name=='*uck*'"));
    assert_eq!(compile_with("name=='*uck'", &config).to_string(), "like(name, '%uck%')");
    assert_eq!(compile_with("name!='uck'", &config).to_string(), "not_like(name, '%uck%')");
    assert_eq!(compile_with("name=='*'", &config).to_string(), "like(name, '%')");

    // Only strings are affected
    assert_eq!(
        compile_with("visits.type==DONE", &config).to_string(),
        "eq(visits.type, DONE)"
    );
    assert_eq!(compile_with("name=gt='M'", &config).to_string(), "gt(name, 'M')");
}

#[test]
fn test_wildcard_ignored_for_ordering() {
    assert_eq!(compile("name=lt='M*'").to_string(), "lt(name, 'M*')");
}

// ============================================================================
// Collections
// ============================================================================

#[test]
fn test_collection_membership() {
    assert_eq!(compile("nicknames=='Chucky'").to_string(), "contains(nicknames, 'Chucky')");
    assert_eq!(compile("nicknames!='Chucky'").to_string(), "not_contains(nicknames, 'Chucky')");
    assert_eq!(compile("nicknames=='*ucky'").to_string(), "like(nicknames, '%ucky')");
}

#[test]
fn test_collection_size() {
    assert_eq!(compile("visits=ge=2").to_string(), "ge(size(visits), 2)");
    assert_eq!(compile("nicknames=lt=1").to_string(), "lt(size(nicknames), 1)");
}

#[test]
fn test_long_size_compiles() {
    match compile("visits=ge=2L") {
        Predicate::Size { value, .. } => assert_eq!(value, Value::Long(2)),
        other => panic!("expected a size comparison, got {}", other),
    }
}

// ============================================================================
// Logical connectors
// ============================================================================

#[test]
fn test_and_or() {
    assert_eq!(
        compile("name=='Chuck',owner.firstName=='Jeff'").to_string(),
        "and(eq(name, 'Chuck'), eq(owner.firstName, 'Jeff'))"
    );
    assert_eq!(
        compile("name=='Leo';owner.firstName=='Jeff'").to_string(),
        "or(eq(name, 'Leo'), eq(owner.firstName, 'Jeff'))"
    );
}

#[test]
fn test_nand_negates_each_operand() {
    assert_eq!(
        compile("name!='Chuck'.owner.firstName!='Jeff'").to_string(),
        "and(not(ne(name, 'Chuck')), not(ne(owner.firstName, 'Jeff')))"
    );
}

#[test]
fn test_nor_negates_each_operand() {
    assert_eq!(
        compile("name!='Leo':owner.firstName=='Jeff'").to_string(),
        "or(not(ne(name, 'Leo')), not(eq(owner.firstName, 'Jeff')))"
    );
}

#[test]
fn test_compose() {
    let a = compile("name=='Max'");
    let b = compile("name=='Leo'");

    assert_eq!(
        compose(LogicalOp::Nand, a.clone(), b.clone()),
        Predicate::and(Predicate::not(a.clone()), Predicate::not(b.clone()))
    );
    assert_eq!(
        compose(LogicalOp::Nor, a.clone(), b.clone()),
        Predicate::or(Predicate::not(a), Predicate::not(b))
    );
}

#[test]
fn test_leaf_count() {
    assert_eq!(compile("(name=='Leo';name=='Max'),visits=ge=2").leaf_count(), 3);
}

// ============================================================================
// Aliases and the allow-list
// ============================================================================

#[test]
fn test_alias_resolves_to_attribute() {
    assert_eq!(compile("born=gt=2012-08-31"), compile("birthDate=gt=2012-08-31"));
    assert_eq!(compile("born=gt=2012-08-31").to_string(), "gt(birthDate, 2012-08-31)");
}

#[test]
fn test_selector_not_allowed() {
    let err = compile_err("owner.lastName=='Black'");
    assert_eq!(
        err,
        VisitError::SelectorNotAllowed {
            selector: "owner.lastName".to_string()
        }
    );
    assert_eq!(err.kind(), ErrorKind::Authorization);
}

#[test]
fn test_allow_list_checked_before_resolution() {
    // Not an attribute either, but the allow-list answers first
    assert_eq!(compile_err("secret==1").kind(), ErrorKind::Authorization);
}

#[test]
fn test_alias_target_is_not_implicitly_allowed() {
    let config = VisitorConfig::new(["born"]).alias("born", "birthDate");
    assert_eq!(
        compile_err_with("birthDate=gt=2012-08-31", &config).kind(),
        ErrorKind::Authorization
    );
}

#[test]
fn test_allowed_selector_without_attribute() {
    let err = compile_err("unknown==1");
    assert_eq!(
        err,
        VisitError::UnknownAttribute {
            selector: "unknown".to_string(),
            entity: "Pet".to_string(),
            segment: "unknown".to_string(),
        }
    );
    assert_eq!(err.kind(), ErrorKind::Resolution);
}

#[test]
fn test_cannot_traverse_scalar() {
    let config = pet_config().allow("name.first");
    let err = compile_err_with("name.first=='M'", &config);
    assert!(matches!(err, VisitError::NotTraversable { ref segment, .. } if segment == "name"));
    assert_eq!(err.kind(), ErrorKind::Resolution);
}

#[test]
fn test_unknown_root_entity() {
    let schema = pet_schema();
    let visitor = PredicateVisitor::new(&schema, "Vet");
    assert_eq!(visitor.root(), "Vet");

    let err = visitor.compile("name=='Max'", &pet_config()).unwrap_err();
    assert_eq!(err, CompileError::Visit(VisitError::UnknownEntity("Vet".to_string())));
}

// ============================================================================
// Coercion and operator errors
// ============================================================================

#[test]
fn test_coercion_errors() {
    let test_cases = vec![
        "birthDate=gt=yesterday",
        "birthDate==2012-08-31T10:00",
        "weight==heavy",
        "vaccinated==yes",
        "vaccinated==1",
        "visits.type==UNKNOWN",
        "visits.type==scheduled",
        "visits.date==2013-13-45",
        "visits=ge=two",
        "visits=ge=2D",
        "visits=ge=2.5",
        "visits.type==DONEL",
    ];

    for query in test_cases {
        assert_eq!(compile_err(query).kind(), ErrorKind::Coercion, "Failed for query: {}", query);
    }
}

#[test]
fn test_unsupported_operators() {
    let config = pet_config().allow("owner");
    let test_cases = vec![
        "vaccinated=gt=true",
        "visits.type=ge=DONE",
        "visits=='x'",
        "owner=='Jeff'",
        "owner=gt='Jeff'",
    ];

    for query in test_cases {
        assert_eq!(
            compile_err_with(query, &config).kind(),
            ErrorKind::Unsupported,
            "Failed for query: {}",
            query
        );
    }
}

#[test]
fn test_error_message_names_selector() {
    let err = compile_err("vaccinated=gt=true");
    assert_eq!(
        err.to_string(),
        "selector 'vaccinated': operator =gt= is not supported on boolean"
    );
}

#[test]
fn test_parse_errors_surface_through_compile() {
    let schema = pet_schema();
    let result = PredicateVisitor::new(&schema, "Pet").compile("name==", &pet_config());
    assert!(matches!(result, Err(CompileError::Parse(_))));
}

// ============================================================================
// Reuse
// ============================================================================

#[test]
fn test_same_tree_compiles_identically() {
    let schema = pet_schema();
    let visitor = PredicateVisitor::new(&schema, "Pet");
    let node = parse("name!='Leo':owner.firstName=='Jeff'").unwrap();

    let plain = pet_config();
    let wildcard = pet_config().with_always_wildcard(true);

    let first = visitor.start(&node, &plain).unwrap();
    let with_wildcard = visitor.start(&node, &wildcard).unwrap();
    let again = visitor.start(&node, &plain).unwrap();

    assert_eq!(first, again);
    assert_ne!(first, with_wildcard);
}

#[test]
fn test_visitor_shared_across_threads() {
    let schema = pet_schema();
    let visitor = PredicateVisitor::new(&schema, "Pet");
    let config = pet_config();

    let predicates: Vec<Predicate> = std::thread::scope(|s| {
        let handles: Vec<_> = ["name=='Max'", "visits=ge=2", "born=gt=2012-08-31"]
            .into_iter()
            .map(|query| {
                let visitor = &visitor;
                let config = &config;
                s.spawn(move || visitor.compile(query, config).unwrap())
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(predicates[1].to_string(), "ge(size(visits), 2)");
    assert_eq!(predicates[2], compile("birthDate=gt=2012-08-31"));
}

// ============================================================================
// Depth limit
// ============================================================================

#[test]
fn test_long_chain_fails_to_compile() {
    let schema = pet_schema();
    let query = vec!["name=='x'"; 5000].join(",");
    let result = PredicateVisitor::new(&schema, "Pet").compile(&query, &pet_config());
    assert!(matches!(
        result,
        Err(CompileError::Parse(ParseError::TooDeep { .. }))
    ));
}

#[test]
fn test_chain_at_limit_compiles() {
    let query = vec!["name=='x'"; MAX_DEPTH].join(".");
    assert_eq!(compile(&query).leaf_count(), MAX_DEPTH);
}

#[test]
fn test_deep_tree_built_by_hand_is_rejected() {
    let leaf = Node::comparison("name", ComparisonOp::Equal, Literal::string("x"));
    let node = (0..MAX_DEPTH).fold(leaf.clone(), |tree, _| {
        Node::logical(LogicalOp::And, tree, leaf.clone())
    });

    let schema = pet_schema();
    let err = PredicateVisitor::new(&schema, "Pet")
        .start(&node, &pet_config())
        .unwrap_err();
    assert_eq!(err, VisitError::TooDeep { depth: MAX_DEPTH + 1 });
    assert_eq!(err.kind(), ErrorKind::Limit);
}

#[test]
fn test_like_display_escapes_quotes() {
    assert_eq!(compile(r"name=='O\'Br*'").to_string(), r"like(name, 'O\'Br%')");
}
