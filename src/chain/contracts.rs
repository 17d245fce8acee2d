// Contract surfaces this tool talks to, as human-readable ABI bindings.
// Only the methods actually issued are declared.

use ethers::contract::abigen;

abigen!(
    UniswapV3Factory,
    r#"[
        function getPool(address tokenA, address tokenB, uint24 fee) external view returns (address pool)
        function createPool(address tokenA, address tokenB, uint24 fee) external returns (address pool)
        event PoolCreated(address indexed token0, address indexed token1, uint24 indexed fee, int24 tickSpacing, address pool)
    ]"#
);

abigen!(
    UniswapV3Pool,
    r#"[
        function slot0() external view returns (uint160 sqrtPriceX96, int24 tick, uint16 observationIndex, uint16 observationCardinality, uint16 observationCardinalityNext, uint8 feeProtocol, bool unlocked)
        function initialize(uint160 sqrtPriceX96) external
        function token0() external view returns (address)
        function token1() external view returns (address)
        function fee() external view returns (uint24)
        function tickSpacing() external view returns (int24)
    ]"#
);

abigen!(
    NonfungiblePositionManager,
    r#"[
        struct MintParams { address token0; address token1; uint24 fee; int24 tickLower; int24 tickUpper; uint256 amount0Desired; uint256 amount1Desired; uint256 amount0Min; uint256 amount1Min; address recipient; uint256 deadline; }
        function mint(MintParams calldata params) external payable returns (uint256 tokenId, uint128 liquidity, uint256 amount0, uint256 amount1)
    ]"#
);

abigen!(
    UniswapV3Quoter,
    r#"[
        function factory() external view returns (address)
        function quoteExactInput(bytes memory path, uint256 amountIn) external returns (uint256 amountOut)
        function quoteExactOutput(bytes memory path, uint256 amountOut) external returns (uint256 amountIn)
    ]"#
);

// Union of the fungible-asset surfaces we need: plain ERC20 views, the
// test-token faucet, and the wrapped-native deposit. Which of drip/deposit
// is legal for a given token is decided by its FundingSource tag, never by
// probing.
abigen!(
    TestToken,
    r#"[
        function decimals() external view returns (uint8)
        function balanceOf(address owner) external view returns (uint256)
        function allowance(address owner, address spender) external view returns (uint256)
        function approve(address spender, uint256 amount) external returns (bool)
        function drip() external
        function deposit() external payable
    ]"#
);
