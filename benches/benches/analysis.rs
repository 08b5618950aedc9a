use criterion::{black_box, criterion_group, criterion_main, Criterion};
use engine::{EngineConfig, Orchestrator, ProjectIndex, Rule, RuleCatalog, Scanner, TreeScanner};
use ir::FileAst;
use parsers::parse_php;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

/// Controller with every rule's sink, repeated to a realistic file size.
fn controller(n: usize) -> String {
    let mut src = String::from(
        "<?php\nnamespace App\\Http\\Controllers;\n\nuse Illuminate\\Http\\Request;\nuse Illuminate\\Support\\Facades\\DB;\nuse Spatie\\QueryBuilder\\QueryBuilder;\n\n",
    );
    src.push_str(&format!("class Controller{n} extends BaseController\n{{\n"));
    for i in 0..40 {
        src.push_str(&format!(
            r#"    public function action{i}(Request $request, string $password)
    {{
        $data = $request->input('data');
        $copy = trim($data);
        unserialize($copy);
        exec('ls ' . $_GET['dir']);
        DB::select("SELECT * FROM t WHERE id = " . $copy);
        QueryBuilder::for_model(Post::class)->allowedSorts($request->query('sort'));
        return view('page', ['rows' => $copy]);
    }}

"#
        ));
    }
    src.push_str("}\n");
    src
}

fn base_classes() -> String {
    let mut src = String::from("<?php\nnamespace App\\Http\\Controllers;\n\n");
    src.push_str("abstract class BaseController\n{\n");
    for i in 0..30 {
        src.push_str(&format!("    protected function helper{i}() {{}}\n"));
    }
    src.push_str("}\n");
    src
}

fn parsed_project(files: usize) -> Vec<FileAst> {
    let mut asts = vec![parse_php(&base_classes(), "app/Http/Controllers/BaseController.php")
        .expect("parse base")];
    for n in 0..files {
        let path = format!("app/Http/Controllers/Controller{n}.php");
        asts.push(parse_php(&controller(n), &path).expect("parse controller"));
    }
    asts
}

fn bench_parsers(c: &mut Criterion) {
    let source = controller(0);
    c.bench_function("parse_php_controller", |b| {
        b.iter(|| parse_php(black_box(&source), "Controller.php").unwrap())
    });
}

fn bench_index(c: &mut Criterion) {
    let files = parsed_project(50);
    c.bench_function("build_project_index", |b| {
        b.iter(|| ProjectIndex::build(black_box(&files)))
    });
}

fn bench_rules(c: &mut Criterion) {
    let files = parsed_project(1);
    let mut scanner = TreeScanner::new();
    scanner.bind_index(Arc::new(ProjectIndex::build(&files)));
    let catalog = RuleCatalog::builtin();
    for rule in catalog.iter() {
        c.bench_function(&format!("rule_{}", rule.id()), |b| {
            b.iter(|| scanner.scan(black_box(&files[1]), rule.as_ref()))
        });
    }
}

fn bench_orchestrator(c: &mut Criterion) {
    let dir = std::env::temp_dir().join("rootcause-php-bench");
    fs::create_dir_all(&dir).expect("bench dir");
    let mut paths: Vec<PathBuf> = Vec::new();
    let base = dir.join("BaseController.php");
    fs::write(&base, base_classes()).expect("write base");
    paths.push(base);
    for n in 0..20 {
        let path = dir.join(format!("Controller{n}.php"));
        fs::write(&path, controller(n)).expect("write controller");
        paths.push(path);
    }
    c.bench_function("orchestrator_20_files", |b| {
        b.iter(|| {
            Orchestrator::new(TreeScanner::new(), RuleCatalog::builtin())
                .with_config(EngineConfig {
                    suppress_comment: Some("rootcause-ignore".into()),
                    ..EngineConfig::default()
                })
                .run(black_box(paths.clone()))
        })
    });
}

criterion_group!(
    benches,
    bench_parsers,
    bench_index,
    bench_rules,
    bench_orchestrator
);
criterion_main!(benches);
