#[cfg(test)]
mod traversal_ir {
    use serde_json::json;
    use sqlgremlin::traversal::{
        ByModulator, Compare, GremlinValue, Order, Origin, Predicate, Step, Traversal,
        TraversalSink,
    };

    #[test]
    fn test_edge_source_with_endpoint_projection() {
        let mut t = Traversal::edges();
        t.append(Step::HasLabel("created".into()));
        t.append(Step::Project(vec!["src".into(), "dst".into()]));
        t.append(Step::By(ByModulator::new(Traversal::of([
            Step::Unfold,
            Step::OutV,
            Step::Id,
        ]))));
        t.append(Step::By(ByModulator::new(Traversal::of([
            Step::Unfold,
            Step::InV,
            Step::Id,
        ]))));
        assert_eq!(t.origin(), Origin::Root);
        assert_eq!(t.len(), 5);
        assert_eq!(
            t.to_groovy(),
            "g.E().hasLabel('created').project('src', 'dst')\
             .by(__.unfold().outV().id()).by(__.unfold().inV().id())"
        );
    }

    #[test]
    fn test_string_values_are_escaped() {
        let t = Traversal::anonymous()
            .then(Step::Values("o'neil".into()))
            .then(Step::Is(Predicate::new(
                Compare::Neq,
                GremlinValue::String("a\\b".into()),
            )));
        assert_eq!(t.to_groovy(), r"__.values('o\'neil').is(neq('a\\b'))");
    }

    #[test]
    fn test_constants() {
        let t = Traversal::of([Step::Coalesce(vec![
            Traversal::of([Step::Values("age".into())]),
            Traversal::of([Step::Constant(GremlinValue::Null)]),
        ])]);
        assert_eq!(
            t.to_string(),
            "__.coalesce(__.values('age'), __.constant(null))"
        );
        assert_eq!(GremlinValue::Double(2.5).to_string(), "2.5d");
        assert_eq!(GremlinValue::Long(-3).to_string(), "-3L");
    }

    #[test]
    fn test_ir_serializes_to_json() {
        let t = Traversal::vertices()
            .then(Step::HasLabel("person".into()))
            .then(Step::Order)
            .then(Step::By(ByModulator::ordered(
                Traversal::of([Step::Unfold, Step::Id]),
                Order::Desc,
            )));
        let value = serde_json::to_value(&t).unwrap();
        assert_eq!(value["origin"], json!("root"));
        assert_eq!(value["steps"][0], json!({"step": "v"}));
        assert_eq!(
            value["steps"][1],
            json!({"step": "has_label", "args": "person"})
        );
        assert_eq!(value["steps"][3]["args"]["order"], json!("desc"));
    }
}
