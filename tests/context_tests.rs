mod common;

use common::FixedStacks;
use stubsynth::{StackContextResolver, StackFrame, ThreadDump, ThreadStack};

const TEST_CLASS: &str = "com.example.MyTest";

fn junit_frames() -> Vec<StackFrame> {
    vec![
        StackFrame::new("jdk.internal.reflect.NativeMethodAccessorImpl", "invoke0").at("NativeMethodAccessorImpl.java", -2),
        StackFrame::new("org.junit.platform.commons.util.ReflectionUtils", "invokeMethod").at("ReflectionUtils.java", 725),
        StackFrame::new("java.lang.Thread", "run").at("Thread.java", 833),
    ]
}

#[test]
fn test_source_method_of_stub_call() {
    common::init_logger();
    let resolver = StackContextResolver::new(FixedStacks::current_only(vec![
        StackFrame::new("java.lang.Thread", "getStackTrace").at("Thread.java", 1610),
        StackFrame::new("com.example.support.CallContext", "sourceMethod").at("CallContext.java", 30),
        StackFrame::new("com.example.Greeter$SynthImpl", "greet"),
        StackFrame::new("com.example.Service", "welcome").at("Service.java", 18),
    ]))
    .with_utility_type("com.example.support.CallContext");
    assert_eq!(resolver.current_source_method_name(), "welcome");
}

#[test]
fn test_runnable_stub_started_by_thread_run() {
    let resolver = StackContextResolver::new(FixedStacks::current_only(vec![
        StackFrame::new("java.lang.Thread", "getStackTrace").at("Thread.java", 1610),
        StackFrame::new("com.example.Task$SynthImpl", "run"),
        StackFrame::new("java.lang.Thread", "run").at("Thread.java", 833),
    ]));
    assert_eq!(resolver.current_source_method_name(), "run");
    assert_eq!(resolver.previous_stack_location(), "Thread.java:833");
}

#[test]
fn test_source_method_with_deeper_skip() {
    let resolver = StackContextResolver::new(FixedStacks::current_only(vec![
        StackFrame::new("java.lang.Thread", "getStackTrace"),
        StackFrame::new("com.example.Greeter$SynthImpl", "greet"),
        StackFrame::new("com.example.GreeterDecorator", "greet"),
        StackFrame::new("com.example.Service", "welcome"),
    ]))
    .with_source_method_skip(2);
    assert_eq!(resolver.current_source_method_name(), "welcome");
}

#[test]
fn test_test_case_on_current_thread() {
    let mut frames = vec![
        StackFrame::new("java.lang.Thread", "getStackTrace"),
        StackFrame::new("com.example.Stubs", "lookup").at("Stubs.java", 21),
        StackFrame::new(TEST_CLASS, "should_do_x").at("MyTest.java", 42),
    ];
    frames.extend(junit_frames());
    let resolver = StackContextResolver::new(FixedStacks::current_only(frames));
    assert_eq!(resolver.current_test_case_name(TEST_CLASS), "should_do_x");
}

#[test]
fn test_lambda_test_case_is_demangled() {
    let mut frames = vec![
        StackFrame::new("com.example.Stubs", "lookup"),
        StackFrame::new(TEST_CLASS, "lambda$should_do_y$0").at("MyTest.java", 57),
        StackFrame::new("org.junit.jupiter.api.AssertThrows", "assertThrows"),
    ];
    frames.extend(junit_frames());
    let resolver = StackContextResolver::new(FixedStacks::current_only(frames));
    assert_eq!(resolver.current_test_case_name(TEST_CLASS), "should_do_y");
}

#[test]
fn test_outermost_test_frame_wins() {
    let resolver = StackContextResolver::new(FixedStacks::current_only(vec![
        StackFrame::new(TEST_CLASS, "givenUser"),
        StackFrame::new(TEST_CLASS, "should_greet_user"),
        StackFrame::new("java.lang.Thread", "run"),
    ]));
    assert_eq!(resolver.current_test_case_name(TEST_CLASS), "should_greet_user");
}

#[test]
fn test_test_case_found_on_another_thread() {
    let stacks = FixedStacks {
        current: vec![
            StackFrame::new("java.lang.Thread", "getStackTrace"),
            StackFrame::new("java.util.concurrent.ThreadPoolExecutor$Worker", "run"),
        ],
        others: vec![
            ThreadStack::new("Reference Handler", vec![StackFrame::new("java.lang.ref.Reference", "waitForReferencePendingList")]),
            ThreadStack::new(
                "Test worker",
                vec![
                    StackFrame::new("java.util.concurrent.FutureTask", "get"),
                    StackFrame::new("com.example.MyTest$should_run_async$1", "call"),
                    StackFrame::new(TEST_CLASS, "should_run_async"),
                ],
            ),
        ],
    };
    let resolver = StackContextResolver::new(stacks);
    assert_eq!(resolver.find_test_case(TEST_CLASS).as_deref(), Some("should_run_async"));
}

#[test]
fn test_missing_test_case_is_empty() {
    let resolver = StackContextResolver::new(FixedStacks::current_only(junit_frames()));
    assert_eq!(resolver.find_test_case(TEST_CLASS), None);
    assert_eq!(resolver.current_test_case_name(TEST_CLASS), "");
}

#[test]
fn test_previous_stack_location() {
    let resolver = StackContextResolver::new(FixedStacks::current_only(vec![
        StackFrame::new("java.lang.Thread", "getStackTrace").at("Thread.java", 1610),
        StackFrame::new("com.example.support.Verifier", "verify").at("Verifier.java", 88),
        StackFrame::new("com.example.MyTest", "should_do_x").at("MyTest.java", 42),
    ]));
    assert_eq!(resolver.previous_stack_location(), "MyTest.java:42");

    let unknown = StackContextResolver::new(FixedStacks::current_only(vec![
        StackFrame::new("com.example.support.Verifier", "verify"),
        StackFrame::new("com.example.Generated", "call"),
    ]));
    assert_eq!(unknown.previous_stack_location(), "Unknown Source:-1");
}

#[test]
fn test_short_stack_yields_empty() {
    let resolver = StackContextResolver::new(FixedStacks::current_only(vec![StackFrame::new(
        "com.example.support.Verifier",
        "verify",
    )]));
    assert_eq!(resolver.previous_stack_location(), "");
    assert_eq!(resolver.current_source_method_name(), "");
}

const DUMP: &str = concat!(
    "Full thread dump OpenJDK 64-Bit Server VM (17.0.8+7 mixed mode, sharing):\n",
    "\n",
    "\"main\" #1 prio=5 os_prio=0 tid=0x00007f0c6c024800 nid=0x1a03 runnable\n",
    "   java.lang.Thread.State: RUNNABLE\n",
    "\tat java.base/java.lang.Thread.getStackTrace(Thread.java:1610)\n",
    "\tat app//com.example.Stubs.lookup(Stubs.java:21)\n",
    "\tat com.example.MyTest.should_do_x(MyTest.java:42)\n",
    "\tat java.base/jdk.internal.reflect.NativeMethodAccessorImpl.invoke0(Native Method)\n",
    "\n",
    "\"pool-1-thread-1\" #14 prio=5 os_prio=0 tid=0x00007f0c6c3b1000 nid=0x1a1c waiting on condition\n",
    "   java.lang.Thread.State: WAITING (parking)\n",
    "\tat com.example.Stubs.lookup(Stubs.java:21)\n",
    "\tat com.example.MyTest$$Lambda$14/0x0000000800c0b0.run(Unknown Source)\n",
    "\tat com.example.MyTest.lambda$should_do_y$0(MyTest.java:57)\n",
    "\tat java.base/java.lang.Thread.run(Thread.java:833)\n",
);

#[test]
fn test_resolution_over_thread_dump() {
    let dump = ThreadDump::parse(DUMP).unwrap();
    let resolver = StackContextResolver::new(&dump);
    assert_eq!(resolver.current_source_method_name(), "should_do_x");
    assert_eq!(resolver.previous_stack_location(), "MyTest.java:42");
    assert_eq!(resolver.current_test_case_name(TEST_CLASS), "should_do_x");

    let worker = dump.clone().with_current_thread("pool-1-thread-1");
    let resolver = StackContextResolver::new(worker);
    assert_eq!(resolver.current_source_method_name(), "run");
    assert_eq!(resolver.current_test_case_name(TEST_CLASS), "should_do_y");
}
