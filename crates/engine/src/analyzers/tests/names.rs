use super::Fixture;
use ir::NodeKind;

#[test]
fn resolves_written_names_with_imports() {
    let fx = Fixture::new(
        r#"<?php
namespace App\Jobs;
use Spatie\QueryBuilder\QueryBuilder as QB;
class Export extends Base
{
    public function run() { marker(); }
}
"#,
    );
    let marker = fx.call("marker");
    let names = marker.names();
    assert_eq!(names.resolve("QB").as_deref(), Some("Spatie\\QueryBuilder\\QueryBuilder"));
    assert_eq!(names.resolve("Mailer").as_deref(), Some("App\\Jobs\\Mailer"));
    assert_eq!(names.resolve("\\DateTime").as_deref(), Some("DateTime"));
    assert_eq!(names.resolve("self").as_deref(), Some("App\\Jobs\\Export"));
    assert_eq!(names.resolve("static").as_deref(), Some("App\\Jobs\\Export"));
    assert_eq!(names.resolve("parent").as_deref(), Some("App\\Jobs\\Base"));
    assert_eq!(names.resolve("$var"), None);
}

#[test]
fn class_of_expressions() {
    let fx = Fixture::new(
        r#"<?php
namespace App;
use Spatie\QueryBuilder\QueryBuilder;
use Illuminate\Http\Request;
class Listing
{
    public function index(Request $request)
    {
        $built = new Builder();
        $query = QueryBuilder::for_model(Post::class);
        $alias = $query;
        $unknown = make();
        a($built, $query, $alias, $unknown, $request, $this);
    }
}
"#,
    );
    let call = fx.call("a");
    let args = call.call().arguments();
    let classes: Vec<Option<String>> = args.iter().map(|a| a.names().class_of()).collect();
    assert_eq!(
        classes,
        vec![
            Some("App\\Builder".to_string()),
            Some("Spatie\\QueryBuilder\\QueryBuilder".to_string()),
            Some("Spatie\\QueryBuilder\\QueryBuilder".to_string()),
            None,
            Some("Illuminate\\Http\\Request".to_string()),
            Some("App\\Listing".to_string()),
        ]
    );
    let new = fx.first(NodeKind::New);
    assert_eq!(new.names().class_of().as_deref(), Some("App\\Builder"));
}
