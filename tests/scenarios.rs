use approx::assert_relative_eq;
use em_laplace::prelude::*;

fn inputs(texts: [&str; 6]) -> BoundaryInputs {
    BoundaryInputs::from_array(texts)
}

#[test]
fn parallel_walls_select_symmetric_constant_series() {
    let domain = Domain::new(1.0, 1.5).expect("valid");
    let binder = BoundaryBinder::new(domain);
    let texts = inputs(["5", "5", "0", "0", "NaN", "NaN"]);
    assert!(binder.required_constants(&texts).expect("parses").is_empty());

    let set = binder.bind(&texts, &ConstantBinding::new()).expect("binds");
    let grid = Grid::new(domain, 50, 50).expect("valid");
    let field = solve(&grid, 50, &set).expect("solves");

    assert_eq!(field.family, SolutionFamily::SymmetricConstant);
    assert!(field.label.contains(r"\cosh"));
    assert!(field.description.contains("5.00"));
    let v = &field.potential;
    for i in 0..50 {
        for j in 0..50 {
            assert_relative_eq!(v[(i, j)], v[(i, 49 - j)], epsilon = 1.0e-12);
        }
    }
}

#[test]
fn no_conditions_give_zero_field() {
    let domain = Domain::new(1.0, 1.5).expect("valid");
    let set = BoundaryBinder::new(domain)
        .bind(&inputs(["NaN"; 6]), &ConstantBinding::new())
        .expect("binds");
    let field = solve(&Grid::new(domain, 10, 10).expect("valid"), 10, &set).expect("solves");

    assert_eq!(field.family, SolutionFamily::Unsupported);
    assert!(field.potential.iter().all(|&v| v == 0.0));
    assert!(field.label.contains("No specific solution"));
}

#[test]
fn step_marker_drives_side_injected_series() {
    let domain = Domain::new(1.0, 1.5).expect("valid");
    let texts = inputs(["V_nought(y)", "NaN", "NaN", "NaN", "NaN", "NaN"]);
    let names = required_constants(&texts).expect("parses");
    assert_eq!(names.into_iter().collect::<Vec<_>>(), vec!["V0".to_string()]);

    let set = BoundaryBinder::new(domain)
        .bind(&texts, &ConstantBinding::new().with("V0", 5.0))
        .expect("binds");
    let field = solve(&Grid::new(domain, 50, 50).expect("valid"), 50, &set).expect("solves");

    assert_eq!(field.family, SolutionFamily::SideInjected);
    assert!(field.is_finite());
    let near_wall = field.potential.column(1);
    assert!(near_wall.iter().any(|v| v.abs() > 0.0));
}

#[test]
fn garbage_is_reported_against_its_edge() {
    let domain = Domain::new(1.0, 1.0).expect("valid");
    for edge in Edge::ALL {
        let mut texts = ["NaN"; 6];
        texts[edge.index()] = "@@@";
        let err = BoundaryBinder::new(domain)
            .bind(&inputs(texts), &ConstantBinding::new())
            .expect_err("rejects");
        match err {
            LaplaceError::Parse(e) => assert_eq!(e.edge, edge),
            other => panic!("unexpected error {other:?}"),
        }
    }
}

#[test]
fn lenient_policy_drops_unparsable_edges() {
    let domain = Domain::new(1.0, 1.5).expect("valid");
    let set = BoundaryBinder::new(domain)
        .with_policy(ParsePolicy::TreatAsUnspecified)
        .bind(&inputs(["5", "5", "0", "0", "@@@", "NaN"]), &ConstantBinding::new())
        .expect("binds");
    assert!(!set.get(Edge::XCenter).is_specified());
    let field = solve(&Grid::new(domain, 6, 6).expect("valid"), 10, &set).expect("solves");
    assert_eq!(field.family, SolutionFamily::SymmetricConstant);
}

#[cfg(feature = "config")]
#[test]
fn bundled_demo_request_loads_and_solves() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/demos/parallel_plates.toml");
    let request = SolveRequest::from_path(path).expect("loads");
    assert_eq!((request.nx, request.ny, request.terms), (50, 50, 50));
    let field = request.run().expect("solves");
    assert_eq!(field.family, SolutionFamily::SymmetricConstant);
    assert!(field.max_abs() > 0.0);
}

#[test]
fn identically_zero_expression_grounds_a_plate() {
    let domain = Domain::new(1.0, 1.5).expect("valid");
    let set = BoundaryBinder::new(domain)
        .bind(&inputs(["5", "5", "0*x", "y*0", "NaN", "NaN"]), &ConstantBinding::new())
        .expect("binds");
    assert_eq!(*set.get(Edge::YMinus), BoundaryCondition::Constant(0.0));
    let field = solve(&Grid::new(domain, 6, 6).expect("valid"), 10, &set).expect("solves");
    assert_eq!(field.family, SolutionFamily::SymmetricConstant);
}
