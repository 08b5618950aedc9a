use super::Fixture;
use crate::analyzers::VariableFact;
use ir::NodeKind;

fn kinds(facts: Vec<VariableFact<'_>>) -> Vec<&'static str> {
    facts
        .iter()
        .map(|f| match f {
            VariableFact::Assignment { .. } => "assignment",
            VariableFact::Parameter { .. } => "parameter",
            VariableFact::Foreach { .. } => "foreach",
        })
        .collect()
}

#[test]
fn facts_are_nearest_first_and_stay_in_function() {
    let fx = Fixture::new(
        r#"<?php
$x = 'outside';
function handle($x)
{
    $x = trim($x);
    $y = 2;
    $x = $x . 'suffix';
    sink($x);
}
"#,
    );
    let arg = fx.arg_of("sink");
    assert_eq!(arg.variable().name().unwrap(), "x");
    let facts: Vec<_> = arg.variable().own_facts().unwrap().collect();
    assert_eq!(kinds(facts.clone()), vec!["assignment", "assignment", "parameter"]);
    assert_eq!(facts[0].site().line(), 7);
    assert_eq!(facts[1].site().line(), 5);
    match facts[0] {
        VariableFact::Assignment { value, .. } => {
            assert_eq!(value.unwrap().text(), "$x . 'suffix'")
        }
        _ => panic!("expected assignment"),
    }
}

#[test]
fn facts_skip_the_enclosing_assignment_and_later_code() {
    let fx = Fixture::new(
        r#"<?php
function f()
{
    $a = 1;
    $a = g($a);
    $a = 3;
}
"#,
    );
    let arg = fx.arg_of("g");
    let facts: Vec<_> = arg.variable().own_facts().unwrap().collect();
    assert_eq!(facts.len(), 1);
    assert_eq!(facts[0].site().line(), 4);
}

#[test]
fn facts_ignore_nested_closures() {
    let fx = Fixture::new(
        r#"<?php
function f()
{
    $cb = function () {
        $v = $_GET['v'];
    };
    $v = 'safe';
    sink($v);
}
"#,
    );
    let facts: Vec<_> = fx.arg_of("sink").variable().own_facts().unwrap().collect();
    assert_eq!(facts.len(), 1);
    assert_eq!(facts[0].site().line(), 7);
}

#[test]
fn arrow_functions_see_the_outer_scope() {
    let fx = Fixture::new(
        r#"<?php
function f()
{
    $v = $_GET['v'];
    $w = 'safe';
    $cb = fn($w) => sink($v, $w);
}
"#,
    );
    let call = fx.call("sink");
    let v = call.call().argument(0).unwrap();
    let facts: Vec<_> = v.variable().own_facts().unwrap().collect();
    assert_eq!(kinds(facts.clone()), vec!["assignment"]);
    assert_eq!(facts[0].site().line(), 4);

    // the parameter shadows the outer `$w`
    let w = call.call().argument(1).unwrap();
    let facts: Vec<_> = w.variable().own_facts().unwrap().collect();
    assert_eq!(kinds(facts), vec!["parameter"]);
}

#[test]
fn closures_see_only_their_use_list() {
    let fx = Fixture::new(
        r#"<?php
function f()
{
    $v = $_GET['v'];
    $w = $_GET['w'];
    $cb = function () use ($v) {
        sink($v, $w);
    };
}
"#,
    );
    let call = fx.call("sink");
    let v = call.call().argument(0).unwrap();
    let facts: Vec<_> = v.variable().own_facts().unwrap().collect();
    assert_eq!(facts.len(), 1);
    assert_eq!(facts[0].site().line(), 4);
    assert!(v.input().is_tainted());

    let w = call.call().argument(1).unwrap();
    assert_eq!(w.variable().own_facts().unwrap().count(), 0);
    assert!(!w.input().is_tainted());
}

#[test]
fn foreach_and_destructuring_bind_variables() {
    let fx = Fixture::new(
        r#"<?php
function f($rows)
{
    [$first, $second] = $rows;
    foreach ($rows as $key => $row) {
        sink($row, $first);
    }
}
"#,
    );
    let call = fx.call("sink");
    let row = call.call().argument(0).unwrap();
    let facts: Vec<_> = row.variable().own_facts().unwrap().collect();
    assert_eq!(kinds(facts.clone()), vec!["foreach"]);
    match facts[0] {
        VariableFact::Foreach { source, .. } => assert_eq!(source.unwrap().text(), "$rows"),
        _ => panic!("expected foreach"),
    }

    let first = call.call().argument(1).unwrap();
    let facts: Vec<_> = first.variable().own_facts().unwrap().collect();
    assert_eq!(kinds(facts), vec!["assignment"]);
}

#[test]
fn top_level_code_searches_the_file() {
    let fx = Fixture::new("<?php\n$a = $_POST['a'];\nsink($a);\n");
    let facts: Vec<_> = fx.arg_of("sink").variable().facts("$a").collect();
    assert_eq!(facts.len(), 1);
    assert_eq!(fx.first(NodeKind::Assignment).line(), facts[0].site().line());
}
