//! System instructions and prompt template sources

/// System instruction sent with every generation
pub const ANALYST_SYSTEM: &str = r"You are a professional financial analyst.

Base every figure on the technical data you are given. Answer with a single JSON
object in exactly the requested shape, with no commentary before or after it.
Be realistic and acknowledge that forecasts are probabilistic.";

/// Forecast request template
pub const FORECAST_TEMPLATE: &str = r#"As a financial analyst, provide a stock price forecast for {{ symbol }} based on this data:

CURRENT METRICS:
- Current Price: ${{ indicators.currentPrice }}
- 7-day SMA: ${{ indicators.sma7 }}
- 20-day SMA: ${{ indicators.sma20 }}
- RSI: {{ indicators.rsi }}
- Volatility: {{ indicators.volatility }}%
- Volume Trend: {{ indicators.volumeTrend }}%
- Recent Price Change: {{ indicators.priceChange }}%
- Support Level: ${{ indicators.support }}
- Resistance Level: ${{ indicators.resistance }}

RECENT PRICE DATA (last {{ recent | length }} days):
{% for point in recent -%}
{{ point.date }}: ${{ point.close }}
{% endfor %}
Please provide a {{ period }}-day forecast in this EXACT JSON format:
{
  "forecast": {
    "targetPrice": [number],
    "priceRange": {"low": [number], "high": [number]},
    "confidence": [number 0-100],
    "trend": "[bullish/bearish/neutral]"
  },
  "analysis": {
    "keyFactors": ["factor1", "factor2", "factor3"],
    "riskLevel": "[low/medium/high]",
    "recommendation": "[buy/hold/sell]"
  },
  "chartData": [
    {"day": 1, "predictedPrice": [number]},
    {"day": 2, "predictedPrice": [number]}
  ]
}

Generate exactly {{ period }} days of chart data. Be realistic and base predictions on technical analysis."#;

/// Two-stock comparison template
pub const COMPARISON_TEMPLATE: &str = r#"As a professional financial analyst, provide a comprehensive comparison between two stocks and investment recommendations.
{% for stock in stocks %}
STOCK {{ loop.index }}: {{ stock.symbol }} ({{ stock.name }})
Sector: {{ stock.sector }}
Current Price: ${{ stock.indicators.currentPrice }}
7-day SMA: ${{ stock.indicators.sma7 }}
20-day SMA: ${{ stock.indicators.sma20 }}
RSI: {{ stock.indicators.rsi }}
Volatility: {{ stock.indicators.volatility }}%
Volume Trend: {{ stock.indicators.volumeTrend }}%
Recent Price Change: {{ stock.indicators.priceChange }}%
Support Level: ${{ stock.indicators.support }}
Resistance Level: ${{ stock.indicators.resistance }}
1-Year Return: {{ stock.yearReturn }}%
Max Drawdown: {{ stock.maxDrawdown }}%
{% endfor %}
Please provide a detailed comparison analysis in this EXACT JSON format:
{
  "analysis": {
    "performanceAnalysis": "Comparison of performance metrics, returns and growth patterns between both stocks",
    "riskAssessment": "Risk analysis including volatility, drawdowns and sector risks for both stocks",
    "recommendation": "Investment recommendation with specific allocation suggestions and rationale",
    "marketOutlook": "Future outlook and market positioning analysis for both stocks"
  },
  "summary": "Executive summary with key findings and final verdict",
  "winner": "Stock symbol of recommended choice",
  "reason": "Brief explanation for the recommendation",
  "metrics": {
    "betterPerformer": "Symbol of stock with better recent performance",
    "lowerRisk": "Symbol of stock with lower risk profile",
    "higherGrowth": "Symbol of stock with higher growth potential"
  }
}

Be specific and analytical. Consider both fundamental and technical factors."#;
