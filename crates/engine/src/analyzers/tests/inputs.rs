use super::Fixture;
use ir::NodeKind;

#[test]
fn recognises_direct_external_input() {
    let fx = Fixture::new(
        r#"<?php
a($_GET['id']);
b($_COOKIE);
c(getenv('HOME'));
d(file_get_contents('php://input'));
e(file_get_contents('/etc/hosts'));
f($_SESSION['user']);
g(filter_input(INPUT_GET, 'q'));
"#,
    );
    assert!(fx.arg_of("a").input().reads_external_input());
    assert!(fx.arg_of("b").input().reads_external_input());
    assert!(fx.arg_of("c").input().reads_external_input());
    assert!(fx.arg_of("d").input().reads_external_input());
    assert!(!fx.arg_of("e").input().reads_external_input());
    assert!(!fx.arg_of("f").input().reads_external_input());
    assert!(fx.arg_of("g").input().reads_external_input());
}

#[test]
fn taint_follows_variable_provenance() {
    let fx = Fixture::new(
        r#"<?php
function handler()
{
    $raw = $_POST['payload'];
    $decoded = base64_decode($raw);
    $copy = "prefix" . $decoded;
    sink($copy);
    safe(intval($raw));
    cast((int) $raw);
    $const = 'a:0:{}';
    constant($const);
}
"#,
    );
    assert!(fx.arg_of("sink").input().is_tainted());
    assert!(!fx.arg_of("safe").input().is_tainted());
    assert!(!fx.arg_of("cast").input().is_tainted());
    assert!(!fx.arg_of("constant").input().is_tainted());
}

#[test]
fn parameters_and_unknown_calls_are_not_tainted() {
    let fx = Fixture::new(
        r#"<?php
function handler($data)
{
    $loaded = load($_GET['id']);
    first($data);
    second($loaded);
    third($_GET['id'] == 'x');
}
"#,
    );
    assert!(!fx.arg_of("first").input().is_tainted());
    assert!(!fx.arg_of("second").input().is_tainted());
    assert!(!fx.arg_of("third").input().is_tainted());
}

#[test]
fn any_reaching_assignment_taints() {
    let fx = Fixture::new(
        r#"<?php
function handler($flag)
{
    if ($flag) {
        $v = $_REQUEST['v'];
    } else {
        $v = 'default';
    }
    sink($v);
}
"#,
    );
    assert!(fx.arg_of("sink").input().is_tainted());
}

#[test]
fn cyclic_assignments_terminate() {
    let fx = Fixture::new(
        r#"<?php
function loop()
{
    $a = $b;
    $b = $a;
    $a = $b;
    sink($a);
}
"#,
    );
    assert!(!fx.arg_of("sink").input().is_tainted());
}

#[test]
fn interpolated_strings_carry_taint() {
    let fx = Fixture::new(
        r#"<?php
$name = $_GET['name'];
sink("hello $name");
other('hello $name');
"#,
    );
    assert!(fx.arg_of("sink").input().is_tainted());
    assert!(!fx.arg_of("other").input().is_tainted());
    assert_eq!(fx.arg_of("other").kind(), NodeKind::StringLiteral);
}

#[test]
fn request_accessors() {
    let fx = Fixture::new(
        r#"<?php
namespace App\Http\Controllers;

use Illuminate\Http\Request;
use Illuminate\Support\Facades\Request as RequestFacade;

class StoreUserRequest extends \Illuminate\Foundation\Http\FormRequest {}

class UserController
{
    public function store(Request $request, StoreUserRequest $form, Service $service)
    {
        a(request('q'));
        b(request()->input('q'));
        c($request->input('q'));
        d($form->validated());
        e($this->request->get('q'));
        f(RequestFacade::input('q'));
        g($service->input('q'));
        h($request->name);
        i(helper('q'));
    }
}
"#,
    );
    for name in ["a", "b", "c", "d", "e", "f", "h"] {
        assert!(
            fx.arg_of(name).request().is_request_access(),
            "{name} should read the request"
        );
    }
    assert!(!fx.arg_of("g").request().is_request_access());
    assert!(!fx.arg_of("i").request().is_request_access());
    assert!(fx.arg_of("c").input().is_tainted());

    let scope = fx.root();
    assert!(scope.request().is_request_class("App\\Http\\Controllers\\StoreUserRequest"));
    assert!(scope.request().is_request_class("\\Illuminate\\Http\\Request"));
    assert!(!scope.request().is_request_class("App\\Http\\Controllers\\UserController"));
}
