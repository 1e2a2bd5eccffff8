//! Calculator - register services and dispatch requests.
//!
//! This example demonstrates:
//! - Declaring a handler's capability table with [`MethodSpec`]
//! - Registering handlers under nested namespace paths
//! - Dispatching MsgPack payloads by dotted method name
//!
//! ```text
//! cargo run --example calculator
//! ```

use std::sync::Arc;

use rpc_service_map::codec::MsgPackCodec;
use rpc_service_map::handler::{CallResult, MethodSpec, Param, Signature, TypeTag};
use rpc_service_map::{CallError, RequestContext, Service, ServiceMap};
use serde::{Deserialize, Serialize};

/// Input structure for the arithmetic methods.
#[derive(Deserialize, Serialize, Debug, Default)]
struct Operands {
    a: i64,
    b: i64,
}

struct Calculator;

impl Calculator {
    fn add(&self, _ctx: &RequestContext, args: &Operands, reply: &mut i64) -> CallResult {
        *reply = args.a + args.b;
        Ok(())
    }

    fn div(&self, _ctx: &RequestContext, args: &Operands, reply: &mut i64) -> CallResult {
        *reply = args
            .a
            .checked_div(args.b)
            .ok_or_else(|| CallError::failed("division by zero"))?;
        Ok(())
    }
}

impl Service for Calculator {
    fn methods(&self) -> Vec<MethodSpec> {
        vec![
            MethodSpec::method("Add", Calculator::add),
            MethodSpec::method("Div", Calculator::div),
            // Local helper, not callable remotely.
            MethodSpec::declared(
                "Helper",
                Signature::new()
                    .param(Param::value::<i32>())
                    .returns(TypeTag::of::<i32>()),
            ),
        ]
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let map = ServiceMap::builder().shared_namespaces(true).build();
    map.register(Arc::new(Calculator), "Math.Int")?;
    map.register_default(Arc::new(Calculator))?;

    println!("{}", map.schema_json()?);

    for name in ["Math.Int.Add", "Calculator.Div", "Math.Int.Helper", "Math"] {
        let ctx = RequestContext::new(name, 1);
        let payload = MsgPackCodec::encode(&Operands { a: 84, b: 2 })?;

        match map.dispatch(name, &ctx, &payload) {
            Ok(reply) => println!("{name} -> {}", MsgPackCodec::decode::<i64>(&reply)?),
            Err(e) => println!("{name} -> error: {e}"),
        }
    }

    Ok(())
}
